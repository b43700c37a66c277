//! Overlapping object categories for report ordering.

use deckhand_core::{ObjectRef, ResultObject};

/// References per category, each in input order. One object may appear in several lists.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    pub new: Vec<&'a ObjectRef>,
    pub changed: Vec<&'a ObjectRef>,
    pub deleted: Vec<&'a ObjectRef>,
    pub orphan: Vec<&'a ObjectRef>,
    pub hooks: Vec<&'a ObjectRef>,
}

pub fn classify(objects: &[ResultObject]) -> Classification<'_> {
    let mut c = Classification::default();
    for o in objects {
        let r = &o.object_ref;
        if o.new { c.new.push(r); }
        if o.is_changed() { c.changed.push(r); }
        if o.deleted { c.deleted.push(r); }
        if o.orphan { c.orphan.push(r); }
        if o.hook { c.hooks.push(r); }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckhand_core::Change;

    fn obj(name: &str) -> ResultObject {
        ResultObject::new(ObjectRef::new("", "v1", "ConfigMap", Some("ns"), name))
    }

    #[test]
    fn categories_are_independent() {
        let mut a = obj("a");
        a.hook = true;
        a.changes.push(Change::new("data.x", "-1\n+2"));
        let mut b = obj("b");
        b.new = true;
        b.orphan = true;
        let c = obj("c");
        let objects = vec![a, b, c];

        let cl = classify(&objects);
        assert_eq!(cl.changed, vec![&objects[0].object_ref]);
        assert_eq!(cl.hooks, vec![&objects[0].object_ref]);
        assert_eq!(cl.new, vec![&objects[1].object_ref]);
        assert_eq!(cl.orphan, vec![&objects[1].object_ref]);
        assert!(cl.deleted.is_empty());
    }

    #[test]
    fn input_order_is_kept() {
        let mut objects: Vec<_> = ["z", "a", "m"].iter().map(|n| { let mut o = obj(n); o.deleted = true; o }).collect();
        objects[1].deleted = false;
        let cl = classify(&objects);
        let names: Vec<_> = cl.deleted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["z", "m"]);
    }
}
