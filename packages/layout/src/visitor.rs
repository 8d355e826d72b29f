use crate::packet::packet_ref;
use serde_json::Value;

/// Visitor for walking block prop trees immutably
///
/// The default implementations walk every nested object and array.
/// Override `visit_packet_ref` to collect references, or `visit_value`
/// to intercept arbitrary nodes.
pub trait PropVisitor: Sized {
    fn visit_value(&mut self, value: &Value) {
        walk_value(self, value);
    }

    fn visit_packet_ref(&mut self, _id: &str) {
        // Leaf node, no children to walk
    }
}

/// Mutable visitor for rewriting prop trees in place
pub trait PropVisitorMut: Sized {
    fn visit_value_mut(&mut self, value: &mut Value) {
        walk_value_mut(self, value);
    }
}

pub fn walk_value<V: PropVisitor>(visitor: &mut V, value: &Value) {
    if let Some(id) = packet_ref(value) {
        visitor.visit_packet_ref(id);
        return;
    }

    match value {
        Value::Array(items) => {
            for item in items {
                visitor.visit_value(item);
            }
        }
        Value::Object(fields) => {
            for field in fields.values() {
                visitor.visit_value(field);
            }
        }
        _ => {}
    }
}

pub fn walk_value_mut<V: PropVisitorMut>(visitor: &mut V, value: &mut Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                visitor.visit_value_mut(item);
            }
        }
        Value::Object(fields) => {
            for field in fields.values_mut() {
                visitor.visit_value_mut(field);
            }
        }
        _ => {}
    }
}
