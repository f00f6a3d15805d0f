mod common;

use catalog::{Catalog, Domain};
use common::{assessment, registry, MapEmbedding, StubLlm};
use recommender_core::index::VectorIndex;
use recommender_core::indexer::{build_memory_index, document_text};

#[test]
fn document_text_matches_index_format() {
    let record = assessment("k1", "Java Core", &[Domain::Knowledge, Domain::Personality]);
    let text = document_text(&record);
    assert_eq!(
        text,
        "Name: Java Core\nType: Knowledge & Skills, Personality & Behavior\nDescription: Java Core assessment"
    );
}

#[tokio::test]
async fn memory_index_covers_the_whole_catalog() {
    let records = vec![
        assessment("k1", "Java Core", &[Domain::Knowledge]),
        assessment("p1", "Teamwork Styles", &[Domain::Personality]),
        assessment("a1", "Numerical Reasoning", &[Domain::Ability]),
    ];
    let mut embedding = MapEmbedding::new(vec![0.1, 0.1]);
    for (i, record) in records.iter().enumerate() {
        embedding = embedding.with(&document_text(record), vec![1.0, i as f32]);
    }
    let catalog = Catalog::from_records(records);
    let reg = registry(embedding, StubLlm::failing());

    // Batch size smaller than the catalog exercises the chunking path.
    let index = build_memory_index(&catalog, &reg, 2).await.unwrap();
    assert_eq!(index.len(), 3);

    let hits = index
        .search(&[1.0, 0.0], Some(Domain::Ability), 10)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "a1");
}
