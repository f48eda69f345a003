/// Split `text` into lines that keep their terminators, so concatenating
/// the pieces gives back `text` byte for byte.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
}
