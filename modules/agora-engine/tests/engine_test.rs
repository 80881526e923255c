//! Integration tests for merge and query over an in-memory store.

use agora_common::{Academic, Paper, TaxonomyCategory, TileKind};
use agora_engine::{
    academics_by_connection, add_or_update, get_academic, network_data, search, SearchCriteria,
};
use agora_store::{CatalogStore, MemoryBackend};

fn store() -> CatalogStore {
    CatalogStore::new(Box::new(MemoryBackend::new()))
}

fn named(name: &str) -> Academic {
    Academic::new(name)
}

// ---------------------------------------------------------------------------
// Merge engine
// ---------------------------------------------------------------------------

#[test]
fn nameless_candidate_is_rejected() {
    let mut store = store();
    assert!(add_or_update(&mut store, named("   ")).is_err());
    assert!(store.is_empty());
}

#[test]
fn new_record_is_inserted_with_novelty_tile() {
    let mut store = store();
    let report = add_or_update(&mut store, named("Michel Foucault")).unwrap();

    assert!(report.created);
    assert_eq!(report.key, "michel-foucault");
    assert_eq!(store.len(), 1);

    let tiles = store.tiles();
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].kind, TileKind::Academic);
}

#[test]
fn add_or_update_is_idempotent() {
    let mut candidate = named("Jacques Derrida");
    candidate.bio = "French philosopher known for deconstruction.".into();
    candidate.papers.push(Paper {
        title: "Of Grammatology".into(),
        year: Some(1967),
        coauthors: Vec::new(),
    });
    candidate.connections.push("Michel Foucault".into());
    candidate
        .taxonomies
        .insert(TaxonomyCategory::Tradition, vec!["Post-structuralism".into()]);

    let mut store = store();
    add_or_update(&mut store, candidate.clone()).unwrap();
    let once = store.get("jacques-derrida").unwrap().clone();

    add_or_update(&mut store, candidate).unwrap();
    let twice = store.get("jacques-derrida").unwrap().clone();

    assert_eq!(once, twice);
    assert_eq!(twice.papers.len(), 1);
    assert_eq!(twice.connections.len(), 1);
    assert_eq!(
        twice.taxonomies[&TaxonomyCategory::Tradition].len(),
        1
    );
}

#[test]
fn paper_dedup_is_case_insensitive_with_year_compat() {
    let mut store = store();
    let mut first = named("Jacques Derrida");
    first.papers.push(Paper {
        title: "of grammatology".into(),
        year: Some(1967),
        coauthors: Vec::new(),
    });
    add_or_update(&mut store, first).unwrap();

    let mut second = named("Jacques Derrida");
    second.papers.push(Paper {
        title: "Of Grammatology".into(),
        year: Some(1967),
        coauthors: Vec::new(),
    });
    add_or_update(&mut store, second).unwrap();

    assert_eq!(store.get("jacques-derrida").unwrap().papers.len(), 1);
}

#[test]
fn bio_is_last_write_wins_but_never_emptied() {
    let mut store = store();
    let mut first = named("Michel Foucault");
    first.bio = "Original bio.".into();
    add_or_update(&mut store, first).unwrap();

    // Empty bio does not overwrite
    add_or_update(&mut store, named("Michel Foucault")).unwrap();
    assert_eq!(store.get("michel-foucault").unwrap().bio, "Original bio.");

    // Non-empty different bio does
    let mut third = named("Michel Foucault");
    third.bio = "Revised bio.".into();
    add_or_update(&mut store, third).unwrap();
    assert_eq!(store.get("michel-foucault").unwrap().bio, "Revised bio.");
}

#[test]
fn taxonomy_values_union_case_sensitive() {
    let mut store = store();
    let mut first = named("A");
    first
        .taxonomies
        .insert(TaxonomyCategory::Theme, vec!["Power".into()]);
    add_or_update(&mut store, first).unwrap();

    let mut second = named("A");
    second
        .taxonomies
        .insert(TaxonomyCategory::Theme, vec!["Power".into(), "power".into()]);
    add_or_update(&mut store, second).unwrap();

    // Case-sensitive union: "Power" deduped, "power" appended
    assert_eq!(
        store.get("a").unwrap().taxonomies[&TaxonomyCategory::Theme],
        vec!["Power", "power"]
    );
}

// ---------------------------------------------------------------------------
// Reciprocal propagation
// ---------------------------------------------------------------------------

#[test]
fn connection_becomes_symmetric_when_target_exists() {
    let mut store = store();
    add_or_update(&mut store, named("Michel Foucault")).unwrap();

    let mut derrida = named("Jacques Derrida");
    derrida.connections.push("Michel Foucault".into());
    let report = add_or_update(&mut store, derrida).unwrap();

    assert_eq!(report.reciprocal_links, vec!["Michel Foucault"]);
    let foucault = store.get("michel-foucault").unwrap();
    assert!(foucault.connections.contains(&"Jacques Derrida".to_string()));

    // One academic tile for each insert plus one connection tile
    let connection_tiles: Vec<_> = store
        .tiles()
        .into_iter()
        .filter(|t| t.kind == TileKind::Connection)
        .collect();
    assert_eq!(connection_tiles.len(), 1);
}

#[test]
fn dangling_connection_is_tolerated_not_propagated() {
    let mut store = store();
    let mut derrida = named("Jacques Derrida");
    derrida.connections.push("Nobody Yet".into());
    let report = add_or_update(&mut store, derrida).unwrap();

    assert!(report.reciprocal_links.is_empty());
    assert_eq!(
        store.get("jacques-derrida").unwrap().connections,
        vec!["Nobody Yet"]
    );
}

#[test]
fn propagation_does_not_cascade_transitively() {
    let mut store = store();
    let mut b = named("B");
    b.connections.push("C".into());
    add_or_update(&mut store, b).unwrap();
    add_or_update(&mut store, named("C")).unwrap();

    // A connects to B; the fixup must touch B only, never follow B → C.
    let mut a = named("A");
    a.connections.push("B".into());
    let report = add_or_update(&mut store, a).unwrap();

    assert_eq!(report.reciprocal_links, vec!["B"]);
    let c = store.get("c").unwrap();
    assert!(!c.connections.contains(&"A".to_string()));
    assert!(!c.connections.contains(&"B".to_string()));
}

#[test]
fn repeat_merge_does_not_duplicate_reciprocal_edge() {
    let mut store = store();
    add_or_update(&mut store, named("Michel Foucault")).unwrap();

    let mut derrida = named("Jacques Derrida");
    derrida.connections.push("Michel Foucault".into());
    add_or_update(&mut store, derrida.clone()).unwrap();
    let report = add_or_update(&mut store, derrida).unwrap();

    assert!(report.reciprocal_links.is_empty());
    let foucault = store.get("michel-foucault").unwrap();
    assert_eq!(
        foucault
            .connections
            .iter()
            .filter(|c| *c == "Jacques Derrida")
            .count(),
        1
    );
}

// ---------------------------------------------------------------------------
// Query engine
// ---------------------------------------------------------------------------

#[test]
fn lookup_three_tiers() {
    let mut store = store();
    add_or_update(&mut store, named("Michel Foucault")).unwrap();

    // (a) normalized key
    assert!(get_academic(&store, "michel-foucault").is_some());
    // (b) case-insensitive exact name
    assert!(get_academic(&store, "MICHEL FOUCAULT").is_some());
    // (c) substring, either direction
    assert!(get_academic(&store, "foucault").is_some());
    assert!(get_academic(&store, "Michel Foucault, the historian").is_some());
    // miss
    assert!(get_academic(&store, "Gilles Deleuze").is_none());
}

#[test]
fn search_is_and_across_criteria() {
    let mut store = store();
    let mut foucault = named("Michel Foucault");
    foucault
        .taxonomies
        .insert(TaxonomyCategory::Discipline, vec!["Philosophy".into()]);
    foucault
        .taxonomies
        .insert(TaxonomyCategory::Theme, vec!["Power".into()]);
    add_or_update(&mut store, foucault).unwrap();

    let mut arendt = named("Hannah Arendt");
    arendt
        .taxonomies
        .insert(TaxonomyCategory::Discipline, vec!["Philosophy".into()]);
    add_or_update(&mut store, arendt).unwrap();

    let criteria = SearchCriteria::builder()
        .discipline("philosophy")
        .theme("power")
        .build();
    let hits = search(&store, &criteria);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Michel Foucault");
}

#[test]
fn search_empty_criteria_returns_everything() {
    let mut store = store();
    add_or_update(&mut store, named("A")).unwrap();
    add_or_update(&mut store, named("B")).unwrap();
    assert_eq!(search(&store, &SearchCriteria::default()).len(), 2);
}

#[test]
fn search_ranks_exact_name_match_first() {
    let mut store = store();
    // Insertion order deliberately puts the exact match second
    add_or_update(&mut store, named("Michel Foucault Society")).unwrap();
    add_or_update(&mut store, named("Michel Foucault")).unwrap();

    let criteria = SearchCriteria::builder().name("Michel Foucault").build();
    let hits = search(&store, &criteria);
    assert_eq!(hits[0].name, "Michel Foucault");
}

#[test]
fn search_orders_by_match_position_then_alphabetical() {
    let mut store = store();
    add_or_update(&mut store, named("Society of Michel Admirers")).unwrap();
    add_or_update(&mut store, named("Michel Henry")).unwrap();
    add_or_update(&mut store, named("Michel Foucault")).unwrap();

    let criteria = SearchCriteria::builder().name("michel").build();
    let hits = search(&store, &criteria);
    let names: Vec<&str> = hits.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Michel Foucault", "Michel Henry", "Society of Michel Admirers"]
    );
}

#[test]
fn by_connection_is_verbatim() {
    let mut store = store();
    let mut derrida = named("Jacques Derrida");
    derrida.connections.push("Michel Foucault".into());
    add_or_update(&mut store, derrida).unwrap();

    assert_eq!(academics_by_connection(&store, "Michel Foucault").len(), 1);
    assert!(academics_by_connection(&store, "michel foucault").is_empty());
}

// ---------------------------------------------------------------------------
// Network projection
// ---------------------------------------------------------------------------

#[test]
fn network_excludes_dangling_links_but_keeps_data() {
    let mut store = store();
    let mut foucault = named("Michel Foucault");
    foucault
        .taxonomies
        .insert(TaxonomyCategory::Discipline, vec!["Philosophy".into()]);
    foucault.connections.push("Jacques Derrida".into());
    foucault.connections.push("Nobody Yet".into());
    add_or_update(&mut store, foucault).unwrap();
    add_or_update(&mut store, named("Jacques Derrida")).unwrap();

    let data = network_data(&store);

    assert_eq!(data.nodes.len(), 2);
    let foucault_node = data
        .nodes
        .iter()
        .find(|n| n.id == "Michel Foucault")
        .unwrap();
    assert_eq!(foucault_node.group, "Philosophy");
    let derrida_node = data
        .nodes
        .iter()
        .find(|n| n.id == "Jacques Derrida")
        .unwrap();
    assert_eq!(derrida_node.group, "Unknown");

    // The dangling "Nobody Yet" edge is excluded from the view…
    assert!(data.links.iter().all(|l| l.target != "Nobody Yet"));
    // …but retained in the record itself.
    assert!(store
        .get("michel-foucault")
        .unwrap()
        .connections
        .contains(&"Nobody Yet".to_string()));
}

#[test]
fn network_links_carry_unit_value() {
    let mut store = store();
    let mut a = named("A");
    a.connections.push("B".into());
    add_or_update(&mut store, a).unwrap();
    add_or_update(&mut store, named("B")).unwrap();

    let data = network_data(&store);
    // A→B from the record plus B→A from reciprocal propagation
    assert_eq!(data.links.len(), 2);
    assert!(data.links.iter().all(|l| l.value == 1));
}
