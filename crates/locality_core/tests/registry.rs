use locality_core::db::DbError;
use locality_core::{
    LocalityRegistry, NeighborhoodLookup, NeighborhoodSeed, RegistryConfig, RegistryError,
    StorageLocation,
};
use std::time::Duration;

fn open_memory_registry() -> LocalityRegistry {
    LocalityRegistry::open(RegistryConfig::in_memory()).unwrap()
}

#[test]
fn seeded_registry_answers_picker_lookups() {
    let mut registry = open_memory_registry();
    registry.seed_reference_data().unwrap();

    let names = registry.list_neighborhoods("Douala").unwrap();
    assert_eq!(names.len(), 55);
    assert!(names.iter().any(|name| name == "Akwa"));
    assert!(registry.list_neighborhoods("Garoua").unwrap().is_empty());

    registry.close().unwrap();
}

#[test]
fn strict_lookup_separates_unknown_and_empty_city() {
    let mut registry = open_memory_registry();
    registry.upsert_city("Bafoussam", Some("Ouest"), None).unwrap();

    assert_eq!(
        registry.lookup_neighborhoods("Bafoussam").unwrap(),
        NeighborhoodLookup::Found(Vec::new())
    );
    assert_eq!(
        registry.lookup_neighborhoods("Garoua").unwrap(),
        NeighborhoodLookup::UnknownCity
    );

    registry.close().unwrap();
}

#[test]
fn admin_operations_round_through_the_pool() {
    let mut registry = open_memory_registry();
    let city_id = registry.upsert_city("Kribi", Some("Sud"), Some(70_000)).unwrap();
    let inserted = registry
        .upsert_neighborhoods(
            city_id,
            &[
                NeighborhoodSeed::new("Mokolo", "Kribi I"),
                NeighborhoodSeed::new("Dombé", "Kribi II"),
            ],
        )
        .unwrap();
    assert_eq!(inserted, 2);

    let rows = registry.neighborhoods_of(city_id).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Dombé");

    let cities = registry.list_cities().unwrap();
    assert_eq!(cities.len(), 1);
    assert_eq!(registry.find_city("Kribi").unwrap().unwrap().id, city_id);

    registry.delete_city("Kribi").unwrap();
    assert_eq!(registry.counts().unwrap().neighborhoods, 0);
    assert!(matches!(
        registry.delete_city("Kribi"),
        Err(RegistryError::Repo(_))
    ));

    registry.close().unwrap();
}

#[test]
fn calls_after_close_fail_with_closed() {
    let mut registry = open_memory_registry();
    registry.close().unwrap();
    assert!(registry.is_closed());

    assert!(matches!(
        registry.list_neighborhoods("Yaoundé"),
        Err(RegistryError::Closed)
    ));
    assert!(matches!(
        registry.lookup_neighborhoods("Yaoundé"),
        Err(RegistryError::Closed)
    ));
    assert!(matches!(registry.checkout(), Err(RegistryError::Closed)));
    assert!(matches!(
        registry.seed_reference_data(),
        Err(RegistryError::Closed)
    ));
    assert!(matches!(registry.close(), Err(RegistryError::Closed)));
}

#[test]
fn exhausted_pool_times_out_and_picker_list_degrades() {
    let mut registry = LocalityRegistry::open(
        RegistryConfig::in_memory().with_checkout_timeout(Duration::from_millis(50)),
    )
    .unwrap();
    registry.seed_reference_data().unwrap();

    let held = registry.checkout().unwrap();
    assert!(matches!(
        registry.lookup_neighborhoods("Yaoundé"),
        Err(RegistryError::Db(DbError::Pool(_)))
    ));
    assert!(registry.list_neighborhoods("Yaoundé").unwrap().is_empty());
    drop(held);

    assert_eq!(registry.list_neighborhoods("Yaoundé").unwrap().len(), 55);
    registry.close().unwrap();
}

#[test]
fn file_registry_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("villes.db");

    let mut registry = LocalityRegistry::open(RegistryConfig::file(&path)).unwrap();
    assert_eq!(
        registry.config().storage,
        StorageLocation::File(path.clone())
    );
    registry.seed_reference_data().unwrap();
    registry.close().unwrap();

    let mut reopened = LocalityRegistry::open(RegistryConfig::file(&path)).unwrap();
    let counts = reopened.counts().unwrap();
    assert_eq!(counts.cities, 2);
    assert_eq!(counts.neighborhoods, 110);
    reopened.close().unwrap();
}

#[test]
fn concurrent_seeding_of_one_city_stores_each_name_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("villes.db");
    let mut registry =
        LocalityRegistry::open(RegistryConfig::file(&path).with_pool_size(4)).unwrap();

    let batch = [
        NeighborhoodSeed::new("Akwa", "Douala I"),
        NeighborhoodSeed::new("Bonanjo", "Douala I"),
        NeighborhoodSeed::new("Bali", "Douala I"),
        NeighborhoodSeed::new("Akwa", "Douala I"),
    ];

    let inserted: usize = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let city_id = registry
                        .upsert_city("Douala", Some("Littoral"), Some(3_500_000))
                        .unwrap();
                    registry.upsert_neighborhoods(city_id, &batch).unwrap()
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .sum()
    });

    assert_eq!(inserted, 3);
    let counts = registry.counts().unwrap();
    assert_eq!(counts.cities, 1);
    assert_eq!(counts.neighborhoods, 3);
    registry.close().unwrap();
}

#[test]
fn pooled_connections_order_accented_names_case_insensitively() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry =
        LocalityRegistry::open(RegistryConfig::file(dir.path().join("villes.db")).with_pool_size(2))
            .unwrap();
    let city_id = registry.upsert_city("Yaoundé", Some("Centre"), None).unwrap();
    registry
        .upsert_neighborhoods(
            city_id,
            &[
                NeighborhoodSeed::unassigned("étoudi"),
                NeighborhoodSeed::unassigned("Ñkol"),
                NeighborhoodSeed::unassigned("Étoudi"),
                NeighborhoodSeed::unassigned("akwa"),
            ],
        )
        .unwrap();

    assert_eq!(
        registry.list_neighborhoods("Yaoundé").unwrap(),
        vec!["akwa", "Étoudi", "étoudi", "Ñkol"]
    );
    let rows = registry.neighborhoods_of(city_id).unwrap();
    let names: Vec<_> = rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["akwa", "Étoudi", "étoudi", "Ñkol"]);

    registry.close().unwrap();
}
