/// Turns a camel-cased picker identifier into the label shown to the user,
/// e.g. `accountPayables` becomes `account payables`.
///
/// A space is inserted before every uppercase letter and the result is
/// lowercased.
pub fn field_label(identifier: &str) -> String {
    let mut label = String::with_capacity(identifier.len() + 4);
    for ch in identifier.chars() {
        if ch.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(ch.to_ascii_lowercase());
    }
    label
}
