//! Integration tests for flatbean record encoding and decoding

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use flatbean::{
    bean_schema, is_bean_shape, Bean, BeanSchema, BigDecimal, BigInt, Blob, Clob, CodecConfig,
    CodecError, ErrorKind, FieldType, RawRecord, RecordCodec, RecordWriter, ScalarKind,
    TextEncoding,
};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Default, PartialEq)]
struct Account {
    owner: Option<String>,
    alias: Option<Arc<str>>,
    grade: Option<char>,
    visits: i32,
    token: Option<Vec<u8>>,
    ratio: f32,
    balance: f64,
    id: i64,
    active: bool,
    credit: Option<BigDecimal>,
    serial: Option<BigInt>,
    opened: Option<chrono::NaiveDateTime>,
    cutoff: Option<NaiveTime>,
    birthday: Option<NaiveDate>,
    tier: i8,
    region: i16,
    reviewed: Option<chrono::DateTime<Local>>,
    notes: Option<Clob>,
    avatar: Option<Blob>,
}

impl Bean for Account {
    fn schema() -> &'static BeanSchema<Self> {
        bean_schema!(Account, |schema| schema
            .scalar("owner", |a| &a.owner, |a, v| a.owner = v)
            .scalar("alias", |a| &a.alias, |a, v| a.alias = v)
            .scalar("grade", |a| &a.grade, |a, v| a.grade = v)
            .scalar("visits", |a| &a.visits, |a, v| a.visits = v)
            .scalar("token", |a| &a.token, |a, v| a.token = v)
            .scalar("ratio", |a| &a.ratio, |a, v| a.ratio = v)
            .scalar("balance", |a| &a.balance, |a, v| a.balance = v)
            .scalar("id", |a| &a.id, |a, v| a.id = v)
            .scalar("active", |a| &a.active, |a, v| a.active = v)
            .scalar("credit", |a| &a.credit, |a, v| a.credit = v)
            .scalar("serial", |a| &a.serial, |a, v| a.serial = v)
            .scalar("opened", |a| &a.opened, |a, v| a.opened = v)
            .scalar("cutoff", |a| &a.cutoff, |a, v| a.cutoff = v)
            .scalar("birthday", |a| &a.birthday, |a, v| a.birthday = v)
            .scalar("tier", |a| &a.tier, |a, v| a.tier = v)
            .scalar("region", |a| &a.region, |a, v| a.region = v)
            .scalar("reviewed", |a| &a.reviewed, |a, v| a.reviewed = v)
            .scalar("notes", |a| &a.notes, |a, v| a.notes = v)
            .scalar("avatar", |a| &a.avatar, |a, v| a.avatar = v))
    }
}

fn sample_account() -> Account {
    Account {
        owner: Some("Ada Lovelace".to_string()),
        alias: Some(Arc::from("countess")),
        grade: Some('A'),
        visits: 17,
        token: Some(b"tok-123".to_vec()),
        ratio: 0.25,
        balance: 1024.5,
        id: 8_589_934_592,
        active: true,
        credit: Some(BigDecimal::from_str("99999999999999999999.0001").unwrap()),
        serial: Some(BigInt::from_str("-340282366920938463463374607431768211456").unwrap()),
        opened: Some(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap().and_hms_opt(8, 30, 0).unwrap()),
        cutoff: Some(NaiveTime::from_hms_opt(17, 0, 59).unwrap()),
        birthday: Some(NaiveDate::from_ymd_opt(1815, 12, 10).unwrap()),
        tier: 3,
        region: -12,
        reviewed: Some(Local.with_ymd_and_hms(2024, 6, 1, 9, 15, 45).earliest().unwrap()),
        notes: Some(Clob::from("analytical engine")),
        avatar: Some(Blob::from(b"PNG".to_vec())),
    }
}

#[derive(Debug, Default, PartialEq)]
struct Greeting {
    str: Option<String>,
    r#in: i32,
}

impl Bean for Greeting {
    fn schema() -> &'static BeanSchema<Self> {
        bean_schema!(Greeting, |schema| schema
            .scalar("str", |g| &g.str, |g, v| g.str = v)
            .scalar("in", |g| &g.r#in, |g, v| g.r#in = v))
    }
}

#[derive(Debug, Default, PartialEq)]
struct Inner {
    x: i32,
}

impl Bean for Inner {
    fn schema() -> &'static BeanSchema<Self> {
        bean_schema!(Inner, |schema| schema.scalar("x", |i| &i.x, |i, v| i.x = v))
    }
}

#[derive(Debug, Default, PartialEq)]
struct Holder {
    items: Vec<Inner>,
}

impl Bean for Holder {
    fn schema() -> &'static BeanSchema<Self> {
        bean_schema!(Holder, |schema| schema.list("items", |h| &h.items, |h, v| h.items = v))
    }
}

#[derive(Debug, Default, PartialEq)]
struct Shipment {
    lines: Vec<Greeting>,
}

impl Bean for Shipment {
    fn schema() -> &'static BeanSchema<Self> {
        bean_schema!(Shipment, |schema| schema.list("lines", |s| &s.lines, |s, v| s.lines = v))
    }
}

#[derive(Debug, Default)]
struct Ledger {
    total: i64,
}

impl Bean for Ledger {
    fn schema() -> &'static BeanSchema<Self> {
        bean_schema!(Ledger, |schema| schema
            .scalar("total", |l| &l.total, |l, v| l.total = v)
            .method("recalculate"))
    }
}

#[test]
fn test_concrete_scalar_scenario() {
    let codec = RecordCodec::default();
    let greeting = Greeting { str: Some("hi".to_string()), r#in: 5 };

    assert_eq!(codec.encode(&greeting).unwrap(), "Str=hi|In=5");

    let decoded = codec.decode::<Greeting>("Str=hi|In=5").unwrap().unwrap();
    assert_eq!(decoded.str.as_deref(), Some("hi"));
    assert_eq!(decoded.r#in, 5);
}

#[test]
fn test_concrete_list_scenario() {
    let codec = RecordCodec::default();
    let holder = Holder { items: vec![Inner { x: 1 }, Inner { x: 1 }] };

    let text = codec.encode(&holder).unwrap();
    assert_eq!(text, "Items=\nX=1\r\nX=1\r\n");

    let decoded = codec.decode::<Holder>(&text).unwrap().unwrap();
    assert_eq!(decoded.items.len(), 2);
    assert_eq!(decoded, holder);
}

#[test]
fn test_record_roundtrip_all_kinds() {
    let codec = RecordCodec::default();
    let account = sample_account();

    let text = codec.encode(&account).unwrap();
    assert!(text.starts_with("Owner=Ada Lovelace|Alias=countess|Grade=A|Visits=17|"));
    assert!(text.contains("|Opened=20200229083000|Cutoff=170059|Birthday=18151210|"));
    assert!(text.contains("|Reviewed=20240601091545|"));
    assert!(!text.ends_with('|'));

    let decoded = codec.decode::<Account>(&text).unwrap().unwrap();
    assert_eq!(decoded, account);
}

#[test]
fn test_null_propagation() {
    let codec = RecordCodec::default();
    let account = Account::default();

    let text = codec.encode(&account).unwrap();
    assert!(text.starts_with("Owner=|Alias=|Grade=|Visits=0|"));
    assert!(text.ends_with("|Notes=|Avatar="));

    let decoded = codec.decode::<Account>(&text).unwrap().unwrap();
    assert_eq!(decoded, account);
    assert_eq!(decoded.owner, None);
}

#[test]
fn test_list_of_n_records() {
    let codec = RecordCodec::default();
    let shipment = Shipment {
        lines: (0..5)
            .map(|i| Greeting { str: Some(format!("line{}", i)), r#in: i })
            .collect(),
    };

    let text = codec.encode(&shipment).unwrap();
    let block = text.strip_prefix("Lines=\n").unwrap();
    assert_eq!(block.matches("\r\n").count(), 5);
    assert!(block.starts_with("Str=line0|In=0\r\n"));

    let decoded = codec.decode::<Shipment>(&text).unwrap().unwrap();
    assert_eq!(decoded.lines.len(), 5);
    assert_eq!(decoded, shipment);
}

#[test]
fn test_list_accepts_plain_newlines() {
    let codec = RecordCodec::default();
    let decoded = codec.decode::<Holder>("Items=\nX=4\nX=5\n").unwrap().unwrap();
    assert_eq!(decoded.items, vec![Inner { x: 4 }, Inner { x: 5 }]);
}

#[test]
fn test_malformed_input_rejected() {
    let codec = RecordCodec::default();

    for text in ["Str=hi|In", "=hi|In=5", "Str=hi||In=5", "garbage"] {
        let err = codec.decode::<Greeting>(text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format, "expected format error for {:?}", text);
    }

    match codec.decode::<Greeting>("Str=hi|In").unwrap_err() {
        CodecError::Format { chunk, .. } => assert_eq!(chunk, "In"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_shape_gate() {
    assert!(is_bean_shape::<Greeting>());
    assert!(!is_bean_shape::<Ledger>());

    let codec = RecordCodec::default();
    let err = codec.encode(&Ledger { total: 10 }).unwrap_err();
    assert_eq!(
        err,
        CodecError::InvalidShape {
            type_name: "Ledger".to_string(),
            offending: vec!["recalculate".to_string()],
        }
    );

    let err = codec.decode::<Ledger>("Total=10").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidShape);

    // blank text never reaches the shape check
    assert!(codec.decode::<Ledger>("").unwrap().is_none());
}

#[test]
fn test_separator_inside_value_is_not_escaped() {
    let codec = RecordCodec::default();
    let greeting = Greeting { str: Some("a|b".to_string()), r#in: 1 };

    let text = codec.encode(&greeting).unwrap();
    assert_eq!(text, "Str=a|b|In=1");
    assert_eq!(codec.decode::<Greeting>(&text).unwrap_err().kind(), ErrorKind::Format);
}

#[test]
fn test_schema_introspection() {
    let schema = Account::schema();
    assert_eq!(schema.len(), ScalarKind::ALL.len());

    let kinds: Vec<_> = schema
        .fields()
        .map(|f| match f.field_type() {
            FieldType::Scalar(kind) => kind,
            FieldType::List { .. } => panic!("unexpected list field {}", f.name()),
        })
        .collect();
    assert_eq!(kinds, ScalarKind::ALL.to_vec());
}

#[test]
fn test_latin1_bytes_in_record() {
    let codec = RecordCodec::new(CodecConfig::default().with_encoding(TextEncoding::Iso8859_1));
    let account = Account { token: Some(vec![0xE9, 0x74, 0xE9]), ..Account::default() };

    let text = codec.encode(&account).unwrap();
    assert!(text.contains("|Token=été|"));

    let decoded = codec.decode::<Account>(&text).unwrap().unwrap();
    assert_eq!(decoded.token, Some(vec![0xE9, 0x74, 0xE9]));
}

#[test]
fn test_raw_record_matches_encoding() {
    let codec = RecordCodec::default();
    let text = codec.encode(&Greeting { str: None, r#in: 9 }).unwrap();

    let record = RawRecord::parse(&text, codec.config()).unwrap();
    assert_eq!(record.iter().collect::<Vec<_>>(), vec![("Str", None), ("In", Some("9"))]);
}

#[test]
fn test_writer_then_decode_each_line() {
    let codec = RecordCodec::default();
    let mut writer = RecordWriter::new(Vec::new(), &codec);

    let greetings: Vec<Greeting> = (1..=3)
        .map(|i| Greeting { str: Some(format!("g{}", i)), r#in: i })
        .collect();
    writer.write_all(&greetings).unwrap();

    let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    let decoded: Vec<Greeting> = output
        .lines()
        .map(|line| codec.decode::<Greeting>(line).unwrap().unwrap())
        .collect();
    assert_eq!(decoded, greetings);
}

#[test]
fn test_codec_shared_across_threads() {
    let codec = Arc::new(RecordCodec::default());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let codec = Arc::clone(&codec);
            std::thread::spawn(move || {
                let greeting = Greeting { str: Some(format!("t{}", i)), r#in: i };
                let text = codec.encode(&greeting).unwrap();
                codec.decode::<Greeting>(&text).unwrap().unwrap() == greeting
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
