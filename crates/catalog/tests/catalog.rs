use catalog::{Assessment, Catalog, Domain};
use std::io::Write;
use std::str::FromStr;

const CRAWLED_RECORD: &str = r#"{
    "name": "Java 8 (New)",
    "url": "https://example.com/solutions/products/product-catalog/view/java-8-new/",
    "description": "Multi-choice test that measures knowledge of Java.",
    "duration": 18,
    "test_type": ["Knowledge & Skills"],
    "remote_support": "Yes",
    "adaptive_support": "No"
}"#;

#[test]
fn domain_parses_codes_and_names() {
    assert_eq!(Domain::from_str("K").unwrap(), Domain::Knowledge);
    assert_eq!(Domain::from_str("p").unwrap(), Domain::Personality);
    assert_eq!(
        Domain::from_str("Knowledge & Skills").unwrap(),
        Domain::Knowledge
    );
    assert_eq!(
        Domain::from_str("personality & behavior").unwrap(),
        Domain::Personality
    );
    assert!(Domain::from_str("Z").is_err());
    assert!(Domain::from_str("Wizardry").is_err());
}

#[test]
fn domain_serializes_as_full_name() {
    let json = serde_json::to_string(&Domain::Knowledge).unwrap();
    assert_eq!(json, r#""Knowledge & Skills""#);
}

#[test]
fn crawled_record_deserializes() {
    let record: Assessment = serde_json::from_str(CRAWLED_RECORD).unwrap();
    assert_eq!(record.name, "Java 8 (New)");
    assert_eq!(record.duration, Some(18));
    assert_eq!(record.test_type, vec![Domain::Knowledge]);
    assert!(record.remote_support);
    assert!(!record.adaptive_support);
    assert_eq!(record.primary_domain(), Some(Domain::Knowledge));
}

#[test]
fn unknown_duration_roundtrips_as_minus_one() {
    let raw = r#"{"name":"X","url":"u","test_type":["K"],"duration":-1}"#;
    let record: Assessment = serde_json::from_str(raw).unwrap();
    assert_eq!(record.duration, None);

    let out = serde_json::to_value(&record).unwrap();
    assert_eq!(out["duration"], serde_json::json!(-1));
    assert_eq!(out["remote_support"], serde_json::json!("No"));
}

#[test]
fn missing_id_defaults_to_url() {
    let record: Assessment = serde_json::from_str(CRAWLED_RECORD).unwrap();
    let url = record.url.clone();
    let catalog = Catalog::from_records(vec![record]);
    let (rank, found) = catalog.get(&url).expect("record keyed by url");
    assert_eq!(rank, 0);
    assert_eq!(found.name, "Java 8 (New)");
}

#[test]
fn duplicate_ids_keep_first_occurrence() {
    let mut a: Assessment = serde_json::from_str(CRAWLED_RECORD).unwrap();
    a.id = "same".into();
    let mut b = a.clone();
    b.name = "Other".into();

    let catalog = Catalog::from_records(vec![a, b]);
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get("same").unwrap().1.name, "Java 8 (New)");
}

#[test]
fn ranks_follow_insertion_order() {
    let mk = |id: &str| {
        let mut r: Assessment = serde_json::from_str(CRAWLED_RECORD).unwrap();
        r.id = id.into();
        r
    };
    let catalog = Catalog::from_records(vec![mk("a"), mk("b"), mk("c")]);
    assert_eq!(catalog.get("a").unwrap().0, 0);
    assert_eq!(catalog.get("b").unwrap().0, 1);
    assert_eq!(catalog.get("c").unwrap().0, 2);
}

#[test]
fn load_reads_a_json_array_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[{CRAWLED_RECORD}]").unwrap();

    let catalog = Catalog::load(file.path()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.records()[0].name, "Java 8 (New)");
}

#[test]
fn load_rejects_malformed_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    assert!(Catalog::load(file.path()).is_err());
}
