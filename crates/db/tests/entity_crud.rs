//! Integration tests for entity CRUD operations.
//!
//! Exercises the full repository layer against a real database:
//! - Create/read/update/delete for all four entities
//! - Year derivation from the sowing date on create and update
//! - RESTRICT foreign keys (categories and varieties in use)
//! - Upsert-by-name and get-or-create semantics
//! - Filtered listing and distinct years

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use garten_db::models::category::{CreateCategory, UpdateCategory};
use garten_db::models::planting_log::{
    CreatePlantingLogEntry, PlantingLogFilter, UpdatePlantingLogEntry,
};
use garten_db::models::species::CreateSpecies;
use garten_db::models::variety::{CreateVariety, UpdateVariety};
use garten_db::repositories::{CategoryRepo, PlantingLogRepo, SpeciesRepo, VarietyRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_variety(name: &str, category_id: i64) -> CreateVariety {
    CreateVariety {
        name: name.to_string(),
        category_id,
        species_id: None,
        sowing_start_month: None,
        sowing_end_month: None,
        info_url: None,
        stock_quantity: None,
        stock_unit: None,
    }
}

fn new_entry(variety_id: i64, sowing_date: NaiveDate) -> CreatePlantingLogEntry {
    CreatePlantingLogEntry {
        variety_id,
        sowing_date,
        seed_count: None,
        sowing_method: None,
        container: None,
        transplant_date: None,
        planting_date: None,
        description: None,
        latitude: None,
        longitude: None,
        gps_accuracy_m: None,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

// ---------------------------------------------------------------------------
// Categories and species
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn category_crud(pool: PgPool) {
    let created = CategoryRepo::create(
        &pool,
        &CreateCategory {
            name: "Gemüse".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(created.name, "Gemüse");

    let found = CategoryRepo::find_by_id(&pool, created.id).await.unwrap();
    assert_eq!(found.unwrap().name, "Gemüse");

    let updated = CategoryRepo::update(
        &pool,
        created.id,
        &UpdateCategory {
            name: Some("Obst".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "Obst");

    assert!(CategoryRepo::delete(&pool, created.id).await.unwrap());
    assert!(CategoryRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .is_none());
    assert!(!CategoryRepo::delete(&pool, created.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn category_names_are_unique(pool: PgPool) {
    CategoryRepo::create(
        &pool,
        &CreateCategory {
            name: "Gemüse".to_string(),
        },
    )
    .await
    .unwrap();

    let err = CategoryRepo::create(
        &pool,
        &CreateCategory {
            name: "Gemüse".to_string(),
        },
    )
    .await
    .unwrap_err();
    let db_err = err.as_database_error().expect("expected database error");
    assert!(db_err.is_unique_violation());
}

#[sqlx::test(migrations = "./migrations")]
async fn get_or_create_is_idempotent(pool: PgPool) {
    let first = CategoryRepo::get_or_create(&pool, "Gemüse").await.unwrap();
    let second = CategoryRepo::get_or_create(&pool, "Gemüse").await.unwrap();
    assert_eq!(first.id, second.id);

    let species = SpeciesRepo::get_or_create(&pool, "Tomate").await.unwrap();
    let again = SpeciesRepo::get_or_create(&pool, "Tomate").await.unwrap();
    assert_eq!(species.id, again.id);

    let all = SpeciesRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
}

// ---------------------------------------------------------------------------
// Varieties
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn variety_crud_with_joined_names(pool: PgPool) {
    let category = CategoryRepo::get_or_create(&pool, "Gemüse").await.unwrap();
    let species = SpeciesRepo::create(
        &pool,
        &CreateSpecies {
            name: "Tomate".to_string(),
        },
    )
    .await
    .unwrap();

    let mut input = new_variety("Tomate Rot", category.id);
    input.species_id = Some(species.id);
    input.sowing_start_month = Some(3);
    input.sowing_end_month = Some(4);
    let created = VarietyRepo::create(&pool, &input).await.unwrap();

    assert_eq!(created.category_name, "Gemüse");
    assert_eq!(created.species_name.as_deref(), Some("Tomate"));
    // Defaults applied by the insert.
    assert_eq!(created.info_url, "");
    assert_eq!(created.stock_quantity, Decimal::ZERO);
    assert_eq!(created.stock_unit, "ANZ");

    let updated = VarietyRepo::update(
        &pool,
        created.id,
        &UpdateVariety {
            name: None,
            category_id: None,
            species_id: None,
            sowing_start_month: None,
            sowing_end_month: None,
            info_url: None,
            stock_quantity: Some(Decimal::new(25, 1)),
            stock_unit: Some("G".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();
    // Untouched fields survive the partial update; `None` on the nullable
    // columns means "leave unchanged", not "clear".
    assert_eq!(updated.name, "Tomate Rot");
    assert_eq!(updated.species_name.as_deref(), Some("Tomate"));
    assert_eq!(updated.sowing_start_month, Some(3));
    assert_eq!(updated.stock_quantity, Decimal::new(25, 1));
    assert_eq!(updated.stock_unit, "G");

    assert!(VarietyRepo::delete(&pool, created.id).await.unwrap());
    assert_eq!(VarietyRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn variety_list_filters_by_category(pool: PgPool) {
    let gemuese = CategoryRepo::get_or_create(&pool, "Gemüse").await.unwrap();
    let obst = CategoryRepo::get_or_create(&pool, "Obst").await.unwrap();
    VarietyRepo::create(&pool, &new_variety("Tomate Rot", gemuese.id))
        .await
        .unwrap();
    VarietyRepo::create(&pool, &new_variety("Erdbeere", obst.id))
        .await
        .unwrap();

    let all = VarietyRepo::list(&pool, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let filtered = VarietyRepo::list(&pool, Some(obst.id)).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Erdbeere");
}

#[sqlx::test(migrations = "./migrations")]
async fn variety_lookup_is_case_insensitive(pool: PgPool) {
    let category = CategoryRepo::get_or_create(&pool, "Gemüse").await.unwrap();
    let created = VarietyRepo::create(&pool, &new_variety("Habanero", category.id))
        .await
        .unwrap();

    let matches = VarietyRepo::list_by_name_ci(&pool, "HABANERO").await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, created.id);

    assert!(VarietyRepo::list_by_name_ci(&pool, "Unbekannt")
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn variety_upsert_by_name(pool: PgPool) {
    let category = CategoryRepo::get_or_create(&pool, "Gemüse").await.unwrap();

    let mut input = new_variety("Tomate Rot", category.id);
    input.sowing_start_month = Some(3);
    let (first, created) = VarietyRepo::upsert_by_name(&pool, &input).await.unwrap();
    assert!(created);

    // Second upsert overwrites in place; the absent start month is cleared.
    let mut input = new_variety("Tomate Rot", category.id);
    input.stock_quantity = Some(Decimal::from(7));
    let (second, created) = VarietyRepo::upsert_by_name(&pool, &input).await.unwrap();
    assert!(!created);
    assert_eq!(second.id, first.id);
    assert_eq!(second.sowing_start_month, None);
    assert_eq!(second.stock_quantity, Decimal::from(7));
    assert_eq!(VarietyRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn category_delete_restricted_while_in_use(pool: PgPool) {
    let category = CategoryRepo::get_or_create(&pool, "Gemüse").await.unwrap();
    let variety = VarietyRepo::create(&pool, &new_variety("Tomate Rot", category.id))
        .await
        .unwrap();

    let err = CategoryRepo::delete(&pool, category.id).await.unwrap_err();
    let db_err = err.as_database_error().expect("expected database error");
    assert!(db_err.is_foreign_key_violation());

    // After the referencing variety is gone the delete succeeds.
    assert!(VarietyRepo::delete(&pool, variety.id).await.unwrap());
    assert!(CategoryRepo::delete(&pool, category.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Planting log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn planting_log_derives_year_on_create_and_update(pool: PgPool) {
    let category = CategoryRepo::get_or_create(&pool, "Gemüse").await.unwrap();
    let variety = VarietyRepo::create(&pool, &new_variety("Habanero", category.id))
        .await
        .unwrap();

    let created = PlantingLogRepo::create(&pool, &new_entry(variety.id, date(2025, 2, 15)))
        .await
        .unwrap();
    assert_eq!(created.year, 2025);
    assert_eq!(created.variety_name, "Habanero");
    assert_eq!(created.seed_count, 0);
    assert_eq!(created.sowing_method, "ANZUCHT");

    // Moving the sowing date across a year boundary moves the year.
    let updated = PlantingLogRepo::update(
        &pool,
        created.id,
        &UpdatePlantingLogEntry {
            variety_id: None,
            sowing_date: Some(date(2024, 12, 31)),
            seed_count: Some(12),
            sowing_method: None,
            container: None,
            transplant_date: None,
            planting_date: None,
            description: None,
            latitude: None,
            longitude: None,
            gps_accuracy_m: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.year, 2024);
    assert_eq!(updated.seed_count, 12);
    assert_eq!(updated.sowing_method, "ANZUCHT");
}

#[sqlx::test(migrations = "./migrations")]
async fn planting_log_create_if_absent(pool: PgPool) {
    let category = CategoryRepo::get_or_create(&pool, "Gemüse").await.unwrap();
    let variety = VarietyRepo::create(&pool, &new_variety("Habanero", category.id))
        .await
        .unwrap();

    let input = new_entry(variety.id, date(2025, 2, 15));
    let first = PlantingLogRepo::create_if_absent(&pool, &input).await.unwrap();
    assert!(first.is_some());

    let second = PlantingLogRepo::create_if_absent(&pool, &input).await.unwrap();
    assert!(second.is_none());
    assert_eq!(PlantingLogRepo::count(&pool).await.unwrap(), 1);

    // A different sowing date in the same year is a new entry.
    let third = PlantingLogRepo::create_if_absent(&pool, &new_entry(variety.id, date(2025, 3, 1)))
        .await
        .unwrap();
    assert!(third.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn planting_log_filters_and_years(pool: PgPool) {
    let category = CategoryRepo::get_or_create(&pool, "Gemüse").await.unwrap();
    let other = CategoryRepo::get_or_create(&pool, "Obst").await.unwrap();
    let habanero = VarietyRepo::create(&pool, &new_variety("Habanero", category.id))
        .await
        .unwrap();
    let erdbeere = VarietyRepo::create(&pool, &new_variety("Erdbeere", other.id))
        .await
        .unwrap();

    PlantingLogRepo::create(&pool, &new_entry(habanero.id, date(2024, 3, 1)))
        .await
        .unwrap();
    PlantingLogRepo::create(&pool, &new_entry(habanero.id, date(2025, 2, 15)))
        .await
        .unwrap();
    PlantingLogRepo::create(&pool, &new_entry(erdbeere.id, date(2025, 4, 1)))
        .await
        .unwrap();

    let years = PlantingLogRepo::distinct_years(&pool).await.unwrap();
    assert_eq!(years, vec![2025, 2024]);

    let by_year = PlantingLogRepo::list(
        &pool,
        &PlantingLogFilter {
            year: Some(2025),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_year.len(), 2);

    let by_category = PlantingLogRepo::list(
        &pool,
        &PlantingLogFilter {
            category_id: Some(other.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].variety_name, "Erdbeere");

    let by_variety = PlantingLogRepo::list(
        &pool,
        &PlantingLogFilter {
            variety_id: Some(habanero.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_variety.len(), 2);

    // Default ordering: newest year first, sowing date ascending within it.
    let all = PlantingLogRepo::list(&pool, &PlantingLogFilter::default())
        .await
        .unwrap();
    assert_eq!(all[0].year, 2025);
    assert_eq!(all[0].sowing_date, date(2025, 2, 15));
    assert_eq!(all[2].year, 2024);
}

#[sqlx::test(migrations = "./migrations")]
async fn variety_delete_restricted_while_logged(pool: PgPool) {
    let category = CategoryRepo::get_or_create(&pool, "Gemüse").await.unwrap();
    let variety = VarietyRepo::create(&pool, &new_variety("Habanero", category.id))
        .await
        .unwrap();
    let entry = PlantingLogRepo::create(&pool, &new_entry(variety.id, date(2025, 2, 15)))
        .await
        .unwrap();

    let err = VarietyRepo::delete(&pool, variety.id).await.unwrap_err();
    let db_err = err.as_database_error().expect("expected database error");
    assert!(db_err.is_foreign_key_violation());

    assert!(PlantingLogRepo::delete(&pool, entry.id).await.unwrap());
    assert!(VarietyRepo::delete(&pool, variety.id).await.unwrap());
}
