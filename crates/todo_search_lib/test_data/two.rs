fn main() {
    // FIXME: handle the error
    // fixme: lowercase does not count
}
