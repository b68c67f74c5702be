//! Wire-level records.

use std::collections::BTreeMap;

use crate::AttributeValue;
use crate::escape::escape_str_into;

/// One record on the wire: an ordered mapping from attribute name to
/// value. The ordering keeps encoded output deterministic so that
/// independently produced encodings of the same record are
/// byte-identical.
pub type Item = BTreeMap<String, AttributeValue>;

/// Write one `"name":{"T":...}` pair.
pub fn write_attribute(name: &str, value: &AttributeValue, out: &mut String) {
    out.push('"');
    escape_str_into(name, out);
    out.push_str("\":");
    value.write_wire(out);
}

/// Write a whole item, e.g. `{"Name":{"S":"Tom"},"Weight":{"N":"80"}}`.
pub fn write_item(item: &Item, out: &mut String) {
    out.push('{');
    for (idx, (name, value)) in item.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        write_attribute(name, value, out);
    }
    out.push('}');
}
