/// Remove `<...>` markup spans from `text`.
///
/// Everything between an opening `<` and the next `>` is dropped, and an
/// unterminated `<` swallows the remainder of the string. Text outside tags
/// is preserved verbatim, including punctuation and whitespace, so a bare
/// `>` with no opening bracket stays in place.
pub(crate) fn strip_markup(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut inside_tag = false;
    for character in text.chars() {
        match character {
            '<' => inside_tag = true,
            '>' if inside_tag => inside_tag = false,
            _ if inside_tag => {}
            _ => stripped.push(character),
        }
    }
    stripped
}
