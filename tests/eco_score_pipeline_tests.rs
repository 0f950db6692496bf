// End-to-end scoring pipeline tests
//
// Purpose: Load a small CSV dataset from disk and check scores, lookups and
// selections against hand-computed values
// Run with: cargo test --test eco_score_pipeline_tests

use approx::assert_relative_eq;
use eco_cart_scorer::{
    derive_cart_selection, find_by_name, list_all, raw_to_eco_score, Catalog, DataLoadError,
    LookupOutcome, RationaleWriter, SustainabilityCategory,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const DATASET: &str = "\
Food product,kg CO2e/ pr. kg,Image Link,Agriculture,ILUC,Processing,Packaging,Transport,Retail
Milk 1.5%,1.5,https://img/milk.png,1,0.5,0.2,0.1,0.1,0.1
Beef mince,30,,20,5,1,1,1,1
Unknown blend,,,0.1,0.1,0.1,0.1,0.1,0.1
Oat milk,0.9,https://img/oat.png,0.2,0,0.3,0.5,0.1,0.1
";

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write fixture");
    file
}

fn load_fixture() -> Catalog {
    let file = write_csv(DATASET);
    Catalog::load(file.path()).expect("fixture loads")
}

#[test]
fn test_rows_without_total_are_dropped() {
    let catalog = load_fixture();

    let names: Vec<String> = list_all(&catalog).into_iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["Milk 1.5%", "Beef mince", "Oat milk"]);
}

#[test]
fn test_raw_and_display_scores() {
    let catalog = load_fixture();

    let milk = catalog.get_exact("Milk 1.5%").unwrap();
    let beef = catalog.get_exact("Beef mince").unwrap();
    let oat = catalog.get_exact("Oat milk").unwrap();

    assert_relative_eq!(milk.eco_score_raw, 0.64, epsilon = 1e-9);
    assert_relative_eq!(beef.eco_score_raw, 11.3, epsilon = 1e-9);
    assert_relative_eq!(oat.eco_score_raw, 0.206, epsilon = 1e-9);

    assert_eq!(raw_to_eco_score(milk.eco_score_raw), 9.4);
    assert_eq!(raw_to_eco_score(beef.eco_score_raw), 0.0);
    assert_eq!(raw_to_eco_score(oat.eco_score_raw), 9.8);
}

#[test]
fn test_normalized_scores_span_dataset() {
    let catalog = load_fixture();

    let milk = catalog.get_exact("Milk 1.5%").unwrap();
    assert_relative_eq!(catalog.get_exact("Oat milk").unwrap().eco_score_normalized, 0.0);
    assert_relative_eq!(catalog.get_exact("Beef mince").unwrap().eco_score_normalized, 1.0);
    assert_relative_eq!(
        milk.eco_score_normalized,
        (0.64 - 0.206) / (11.3 - 0.206),
        epsilon = 1e-9
    );
}

#[tokio::test]
async fn test_lookup_end_to_end() {
    let catalog = load_fixture();
    let writer = RationaleWriter::default();

    let LookupOutcome::Found(result) = find_by_name(&catalog, "milk", &writer).await else {
        panic!("milk should match");
    };
    assert_eq!(result.name, "Milk 1.5%");
    assert_eq!(result.eco_score, 9.4);
    assert_eq!(result.label, SustainabilityCategory::High);
    assert_eq!(result.image_link.as_deref(), Some("https://img/milk.png"));

    let LookupOutcome::Found(beef) = find_by_name(&catalog, "Beef", &writer).await else {
        panic!("beef should match");
    };
    assert_eq!(beef.label, SustainabilityCategory::Low);
    assert_eq!(beef.image_link, None);

    assert!(matches!(
        find_by_name(&catalog, "tofu", &writer).await,
        LookupOutcome::NotFound(_)
    ));
}

#[test]
fn test_cart_selection_over_loaded_catalog() {
    let catalog = load_fixture();
    let mut rng = StdRng::seed_from_u64(2024);
    let cart = vec!["Oat milk".to_string(), "oat milk".to_string()];

    let selection = derive_cart_selection(&catalog, &cart, 5, 30, &mut rng);
    assert_eq!(selection.used, vec!["Oat milk"]);
    assert_eq!(selection.recommended.len(), 3);
    assert_eq!(selection.final_ingredients.len(), 3);
    assert_eq!(selection.final_ingredients[0], "Oat milk");
}

#[test]
fn test_missing_columns_are_reported() {
    let file = write_csv("Food product,kg CO2e/ pr. kg,Agriculture\nMilk,1.0,0.5\n");

    match Catalog::load(file.path()) {
        Err(DataLoadError::MissingColumns(missing)) => {
            assert_eq!(
                missing,
                vec!["ILUC", "Image Link", "Packaging", "Processing", "Retail", "Transport"]
            );
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn test_workbook_scores_match_csv() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/emissions_sample.xlsx");
    let workbook = Catalog::load(&path).expect("workbook loads");
    let csv = load_fixture();

    assert_eq!(workbook.len(), csv.len());
    for (from_xlsx, from_csv) in workbook.iter().zip(csv.iter()) {
        assert_eq!(from_xlsx.name, from_csv.name);
        assert_eq!(from_xlsx.image_link, from_csv.image_link);
        assert_relative_eq!(from_xlsx.eco_score_raw, from_csv.eco_score_raw, epsilon = 1e-9);
        assert_relative_eq!(
            from_xlsx.eco_score_normalized,
            from_csv.eco_score_normalized,
            epsilon = 1e-9
        );
        assert_eq!(from_xlsx.eco_score(), from_csv.eco_score());
    }
}
