//! End-to-end normalization tests.

use indexmap::IndexMap;
use relink_core::{Normalizer, OutputTable};
use relink_model::{Aggregation, Collection, EngineConfig, Record, SchemaConfig};

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn table<'a>(tables: &'a [OutputTable], name: &str) -> &'a OutputTable {
    tables
        .iter()
        .find(|t| t.collection == name)
        .unwrap_or_else(|| panic!("missing output table {name}"))
}

#[test]
fn organizations_receive_their_sites() {
    let mut collections = IndexMap::new();
    collections.insert(
        "Sites".to_string(),
        SchemaConfig {
            keep: fields(&["Slug", "Organization"]),
            slug_source: "Slug".to_string(),
            ..SchemaConfig::default()
        },
    );
    collections.insert(
        "Organizations".to_string(),
        SchemaConfig {
            keep: fields(&["Name", "Sites"]),
            slug_source: "Name".to_string(),
            ..SchemaConfig::default()
        },
    );
    let config = EngineConfig {
        collections,
        reference_targets: IndexMap::new(),
        aggregations: vec![Aggregation {
            target: "Organizations".to_string(),
            parent_key: "Name".to_string(),
            field: "Sites".to_string(),
            source: "Sites".to_string(),
            group_field: "Organization".to_string(),
            value_field: "Slug".to_string(),
        }],
    };

    let output = Normalizer::new(&config).expect("config").run(vec![
        Collection::new(
            "Sites",
            vec![
                Record::from_pairs([("Slug", "s1"), ("Organization", "Acme River Watch")]),
                Record::from_pairs([("Slug", "s2"), ("Organization", "Acme River Watch")]),
            ],
        ),
        Collection::new(
            "Organizations",
            vec![Record::from_pairs([("Name", "Acme River Watch")])],
        ),
    ]);

    let orgs = table(&output.tables, "Organizations");
    assert_eq!(orgs.headers, vec!["Name", "Sites", "slug"]);
    assert_eq!(orgs.rows.len(), 1);
    let org = &orgs.rows[0];
    assert_eq!(org.value("Name"), "Acme River Watch");
    assert_eq!(org.value("slug"), "acme-river-watch");
    assert_eq!(org.value("Sites"), "s1; s2");
}

#[test]
fn default_dataset_cross_references_resolve() {
    let stations = Collection::new(
        "Stations",
        vec![
            Record::from_pairs([
                ("SiteID ", "BC-01"),
                ("Site Name", "Bear Creek at Mill Rd"),
                ("Waterbody", "Bear Creek"),
                ("Watersheds (from Waterbody) 2", "Upper Clearwater"),
                ("Monitoring Organization", r#""Clearwater Alliance, Inc.", River Keepers"#),
                ("Most Recent Ecoli Reading", "126"),
            ]),
            Record::from_pairs([
                ("SiteID ", "BC-02"),
                ("Waterbody", "Bear Creek"),
                ("Monitoring Organization", "River Keepers"),
            ]),
        ],
    );
    let waterbodies = Collection::new(
        "Waterbodies",
        vec![
            Record::from_pairs([
                ("Name", "Bear Creek"),
                ("Watersheds", "Upper Clearwater"),
                ("Monitoring Sites", "BC-02, BC-01"),
            ]),
            Record::from_pairs([("Name", "Lost Lake"), ("Watersheds", "Upper Clearwater")]),
        ],
    );
    let watersheds = Collection::new(
        "Watersheds",
        vec![Record::from_pairs([
            ("Name", "Upper Clearwater"),
            ("Waterbodies", "Bear Creek, Missing Pond"),
        ])],
    );
    let organizations = Collection::new(
        "Organizations",
        vec![
            Record::from_pairs([("Organization Name", "Clearwater Alliance, Inc.")]),
            Record::from_pairs([("Organization Name", "River Keepers")]),
        ],
    );

    let normalizer = Normalizer::new(&EngineConfig::default()).expect("default config");
    let output = normalizer.run(vec![stations, waterbodies, watersheds, organizations]);
    assert!(output.missing.is_empty());
    assert!(output.pass_through.is_empty());

    let stations = table(&output.tables, "Stations");
    let first = &stations.rows[0];
    assert_eq!(first.value("SiteID"), "BC-01");
    assert_eq!(first.value("Waterbody"), "bear-creek");
    assert_eq!(first.value("Watersheds (from Waterbody) 2"), "upper-clearwater");
    assert_eq!(
        first.value("Monitoring Organization"),
        "clearwater-alliance-inc;river-keepers"
    );
    assert_eq!(first.value("Most Recent Ecoli Reading"), "126");
    assert_eq!(first.value("Latitude"), "");
    assert_eq!(first.slug(), "bc-01");
    assert_eq!(stations.headers.last().map(String::as_str), Some("slug"));

    let waterbody = &table(&output.tables, "Waterbodies").rows[0];
    assert_eq!(waterbody.value("Watersheds"), "upper-clearwater");
    assert_eq!(waterbody.value("Monitoring Sites"), "bc-02;bc-01");
    assert_eq!(waterbody.value("Sites"), "bc-01; bc-02");

    let watershed_table = table(&output.tables, "Watersheds");
    let watershed = &watershed_table.rows[0];
    // Rebuilt from the Waterbodies table rather than parsed from the input cell.
    assert_eq!(watershed.value("Waterbodies"), "bear-creek; lost-lake");
    assert_eq!(watershed.value("Sites"), "bc-01");
    assert_eq!(watershed_table.stats.resolved, 0);
    assert_eq!(watershed_table.stats.fallbacks, 0);

    let orgs = table(&output.tables, "Organizations");
    assert_eq!(orgs.rows[0].slug(), "clearwater-alliance-inc");
    assert_eq!(orgs.rows[1].value("Sites"), "bc-02");
    assert_eq!(orgs.rows[0].value("Sites"), "");

    assert_eq!(output.registry.collection_len("Stations"), 2);
    assert_eq!(
        output.registry.lookup("Organizations", "Clearwater Alliance, Inc."),
        Some("clearwater-alliance-inc")
    );
}

#[test]
fn projection_slug_matches_slug_source() {
    let normalizer = Normalizer::new(&EngineConfig::default()).expect("default config");
    let output = normalizer.run(vec![Collection::new(
        "Watersheds",
        vec![
            Record::from_pairs([("Name", "  Lower Clearwater  ")]),
            Record::from_pairs([("Name", "")]),
            Record::from_pairs([("Other", "x")]),
        ],
    )]);
    let rows = &table(&output.tables, "Watersheds").rows;
    let slugs: Vec<_> = rows.iter().map(Record::slug).collect();
    assert_eq!(slugs, vec!["lower-clearwater", "", ""]);
    assert_eq!(table(&output.tables, "Watersheds").stats.empty_slugs, 2);
}
