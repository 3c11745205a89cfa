use migrato_core::{MigrationEntry, NameError, SortKey, SortOrder};
use std::cmp::Ordering;

#[test]
fn parse_keys() -> anyhow::Result<()> {
    assert_eq!(SortKey::parse("m_001_create_users")?.groups(), &[1]);
    assert_eq!(SortKey::parse("m190101_120000_init")?.groups(), &[190101, 120000]);
    assert_eq!(SortKey::parse("20240101120000_add_email")?.groups(), &[20240101120000]);
    assert_eq!(SortKey::parse("V2__add_index")?.groups(), &[2]);

    Ok(())
}

#[test]
fn parse_malformed() {
    assert_eq!(
        SortKey::parse("create_users"),
        Err(NameError::MissingTimestamp("create_users".to_owned()))
    );
    assert!(SortKey::parse("m").is_err());
    assert_eq!(
        SortKey::parse("m_99999999999999999999999_big"),
        Err(NameError::TimestampOverflow(
            "m_99999999999999999999999_big".to_owned()
        ))
    );
}

#[test]
fn keys_compare_numerically() -> anyhow::Result<()> {
    assert!(SortKey::parse("m_9_nine")? < SortKey::parse("m_10_ten")?);
    assert!(SortKey::parse("m190101_120000_a")? < SortKey::parse("m190101_120001_a")?);

    Ok(())
}

#[test]
fn newest_first_reverses_oldest_first() {
    let names = ["m_003_c", "m_001_a", "m_002_b", "m_002_a"];

    let mut oldest = names.to_vec();
    oldest.sort_by(|a, b| SortOrder::OldestFirst.compare(a, b));
    assert_eq!(oldest, ["m_001_a", "m_002_a", "m_002_b", "m_003_c"]);

    let mut newest = names.to_vec();
    newest.sort_by(|a, b| SortOrder::NewestFirst.compare(a, b));
    assert_eq!(newest, ["m_003_c", "m_002_b", "m_002_a", "m_001_a"]);
}

#[test]
fn malformed_names_sort_last() {
    let entries = [
        MigrationEntry::new("app", "zzz_notes"),
        MigrationEntry::new("app", "m_002_b"),
        MigrationEntry::new("app", "readme"),
        MigrationEntry::new("app", "m_001_a"),
    ];

    for order in [SortOrder::OldestFirst, SortOrder::NewestFirst] {
        let mut refs = entries.iter().collect::<Vec<_>>();
        order.sort(&mut refs);

        let names = refs.iter().map(|e| e.name.as_str()).collect::<Vec<_>>();
        assert_eq!(&names[2..], ["readme", "zzz_notes"], "{order}");
    }

    assert_eq!(
        SortOrder::NewestFirst.compare("m_001_a", "readme"),
        Ordering::Less
    );
}

#[test]
fn parse_and_toggle_order() -> anyhow::Result<()> {
    assert_eq!("newest-first".parse::<SortOrder>()?, SortOrder::NewestFirst);
    assert_eq!(SortOrder::OldestFirst.to_string(), "oldest-first");
    assert_eq!(SortOrder::from_newest_first(true), SortOrder::NewestFirst);
    assert_eq!(SortOrder::NewestFirst.toggle(), SortOrder::OldestFirst);
    assert_eq!(SortOrder::default(), SortOrder::OldestFirst);

    Ok(())
}

#[test]
fn timestamps_running_into_the_name() -> anyhow::Result<()> {
    assert_eq!(
        SortKey::parse("M190101120000CreateUser")?.groups(),
        &[190101120000]
    );
    assert_eq!(
        SortKey::parse("20240101120000-add-email")?.groups(),
        &[20240101120000]
    );
    assert_eq!(SortKey::parse("m_001a_init")?.groups(), &[1]);

    let names = [
        "M200101120000AddEmail",
        "20240101120000-add-email",
        "M190101120000CreateUser",
        "20230101120000-init",
    ];

    let mut oldest = names.to_vec();
    oldest.sort_by(|a, b| SortOrder::OldestFirst.compare(a, b));
    assert_eq!(
        oldest,
        [
            "M190101120000CreateUser",
            "M200101120000AddEmail",
            "20230101120000-init",
            "20240101120000-add-email",
        ]
    );

    let mut newest = names.to_vec();
    newest.sort_by(|a, b| SortOrder::NewestFirst.compare(a, b));
    oldest.reverse();
    assert_eq!(newest, oldest);

    Ok(())
}
