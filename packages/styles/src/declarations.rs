use atelier_protocol::PropertyMap;

/// Split `prop: value; prop: value` into a map
///
/// Each declaration is split on its first `:`. Entries with an empty
/// property or value are dropped; a repeated property keeps the last value.
pub fn parse_declarations(text: &str) -> PropertyMap {
    let mut declarations = PropertyMap::new();

    for declaration in text.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };

        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            continue;
        }

        declarations.insert(property.to_string(), value.to_string());
    }

    declarations
}
