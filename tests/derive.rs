use flatbind::{FieldFlags, Record, Reflect, ReflectRef, Value};

#[test]
fn field_table_follows_declaration_order() {
    #[derive(Record, Default)]
    #[allow(dead_code)]
    struct Server {
        #[bind(tag = "host_name")]
        host: String,
        #[bind(skip)]
        cache: Vec<u8>,
        #[bind(embed, readonly)]
        limits: Limits,
        r#type: String,
    }

    #[derive(Record, Default)]
    struct Limits {
        max: u32,
    }

    let server = Server::default();
    let fields = server.fields();

    let names: Vec<_> = fields.iter().map(|f| f.name).collect();
    assert_eq!(names, ["host", "limits", "type"]);

    assert_eq!(fields[0].tag, Some("host_name"));
    assert_eq!(fields[0].tag_name(), "host_name");
    assert_eq!(fields[2].tag_name(), "type");

    assert_eq!(fields[1].flags, FieldFlags::EMBEDDED | FieldFlags::READONLY);
    assert!(fields[1].is_embedded());
    assert!(fields[1].is_readonly());

    assert!(server.field(3).is_none());
}

#[test]
fn generic_records() {
    #[derive(Record, Default)]
    struct Slot<T> {
        value: T,
    }

    let mut slot = Slot::<u16>::default();
    flatbind::populate_from_string_map(&mut slot, [("value", "12")], "").unwrap();
    assert_eq!(slot.value, 12);
    assert_eq!(flatbind::get_field_value(&slot, "value").unwrap(), Value::Int(12));
}

#[test]
fn boxed_members_are_transparent() {
    #[derive(Record, Default)]
    struct Inner {
        enabled: bool,
    }

    #[derive(Record, Default)]
    struct Outer {
        inner: Box<Inner>,
        count: Box<i32>,
    }

    let mut outer = Outer::default();
    flatbind::populate_from_string_map(&mut outer, [("inner.enabled", "1"), ("count", "3")], "")
        .unwrap();
    assert!(outer.inner.enabled);
    assert_eq!(*outer.count, 3);

    assert!(matches!(outer.inner.reflect_ref(), ReflectRef::Record(_)));
    assert!(outer.type_name().ends_with("Outer"));
}
