//! Integration tests: artifacts on disk through to ranked titles

use std::fs;
use std::path::Path;

use movie_recommender::artifact::write_features;
use movie_recommender::{
    loader, ArtifactPaths, DistanceMetric, FlatIndex, Recommender, RecommenderError, Vector,
};
use tempfile::TempDir;

const TITLES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

fn line_rows() -> Vec<Vector> {
    [0.0, 1.0, 3.0, 6.0, 10.0, 15.0]
        .iter()
        .map(|&x| Vector::new(vec![x, 0.0, 0.0]))
        .collect()
}

fn write_artifacts(dir: &Path, titles: &[&str], rows: &[Vector]) -> ArtifactPaths {
    let paths = ArtifactPaths::in_dir(dir);

    let mut csv = String::from("movie_id,title\n");
    for (i, title) in titles.iter().enumerate() {
        csv.push_str(&format!("{},{}\n", i + 100, title));
    }
    fs::write(&paths.catalog, csv).unwrap();

    write_features(&paths.features, rows).unwrap();
    FlatIndex::fit(DistanceMetric::Euclidean, false, rows)
        .unwrap()
        .save(&paths.index)
        .unwrap();
    paths
}

#[test]
fn test_scenario_top_five() {
    let dir = TempDir::new().unwrap();
    let paths = write_artifacts(dir.path(), &TITLES, &line_rows());

    let ctx = loader::load(&paths).unwrap();
    let recs = Recommender::new(&ctx).recommend_title("A", 5).unwrap();

    assert_eq!(recs.titles(), vec!["B", "C", "D", "E", "F"]);
}

#[test]
fn test_scenario_top_two() {
    let dir = TempDir::new().unwrap();
    let paths = write_artifacts(dir.path(), &TITLES, &line_rows());

    let ctx = loader::load(&paths).unwrap();
    let recs = Recommender::new(&ctx).recommend_title("A", 2).unwrap();

    assert_eq!(recs.titles(), vec!["B", "C"]);
}

#[test]
fn test_each_missing_artifact_is_fatal() {
    for missing in 0..3 {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(dir.path(), &TITLES, &line_rows());
        let gone = paths.all()[missing].to_path_buf();
        fs::remove_file(&gone).unwrap();

        match loader::load(&paths) {
            Err(RecommenderError::MissingArtifact { path }) => assert_eq!(path, gone),
            Err(e) => panic!("expected MissingArtifact, got {}", e),
            Ok(_) => panic!("load succeeded with {} missing", gone.display()),
        }
    }
}

#[test]
fn test_misaligned_features_rejected() {
    let dir = TempDir::new().unwrap();
    let paths = write_artifacts(dir.path(), &TITLES, &line_rows());

    // Overwrite the feature matrix with one row too few.
    write_features(&paths.features, &line_rows()[..5]).unwrap();

    assert!(matches!(
        loader::load(&paths),
        Err(RecommenderError::AlignmentMismatch {
            catalog: 6,
            features: 5,
            index: 6
        })
    ));
}

#[test]
fn test_corrupt_index_rejected() {
    let dir = TempDir::new().unwrap();
    let paths = write_artifacts(dir.path(), &TITLES, &line_rows());
    fs::write(&paths.index, b"not an index").unwrap();

    assert!(matches!(
        loader::load(&paths),
        Err(RecommenderError::CorruptArtifact { .. })
    ));
}

#[test]
fn test_normalized_cosine_index() {
    let dir = TempDir::new().unwrap();
    let rows = vec![
        Vector::new(vec![1.0, 0.0]),
        Vector::new(vec![10.0, 1.0]),
        Vector::new(vec![0.0, 1.0]),
        Vector::new(vec![1.0, 1.0]),
    ];
    let paths = ArtifactPaths::in_dir(dir.path());
    fs::write(&paths.catalog, "title\nEast\nMostly East\nNorth\nNorth East\n").unwrap();
    write_features(&paths.features, &rows).unwrap();
    FlatIndex::fit(DistanceMetric::Cosine, true, &rows)
        .unwrap()
        .save(&paths.index)
        .unwrap();

    let ctx = loader::load(&paths).unwrap();
    let recs = Recommender::new(&ctx).recommend_title("East", 3).unwrap();
    assert_eq!(recs.titles(), vec!["Mostly East", "North East", "North"]);
}

#[test]
fn test_failure_leaves_context_usable() {
    let dir = TempDir::new().unwrap();
    let paths = write_artifacts(dir.path(), &TITLES, &line_rows());
    let ctx = loader::load(&paths).unwrap();
    let recommender = Recommender::new(&ctx);

    let err = recommender.recommend_title("Z", 5).unwrap_err();
    assert!(matches!(err, RecommenderError::TitleNotFound { .. }));

    let recs = recommender.recommend_title("F", 1).unwrap();
    assert_eq!(recs.titles(), vec!["E"]);
}

#[test]
fn test_unknown_title_surfaces_through_anyhow() {
    let dir = TempDir::new().unwrap();
    let paths = write_artifacts(dir.path(), &TITLES, &line_rows());
    let ctx = loader::load(&paths).unwrap();

    // The binary returns request errors from `main` as `anyhow::Error`.
    let run = || -> anyhow::Result<usize> {
        let recs = Recommender::new(&ctx).recommend_title("Nope", 5)?;
        Ok(recs.len())
    };
    let err = run().unwrap_err();
    assert_eq!(err.to_string(), "Title not found: Nope");
    assert!(matches!(
        err.downcast_ref::<RecommenderError>(),
        Some(RecommenderError::TitleNotFound { .. })
    ));
}
