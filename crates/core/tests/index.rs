use catalog::Domain;
use recommender_core::index::{MemoryIndex, VectorIndex};

fn sample_index() -> MemoryIndex {
    let mut index = MemoryIndex::new();
    index.insert("k1", vec![Domain::Knowledge], vec![1.0, 0.0]);
    index.insert("p1", vec![Domain::Personality], vec![0.0, 1.0]);
    index.insert("kp", vec![Domain::Knowledge, Domain::Personality], vec![1.0, 1.0]);
    index.insert("k2", vec![Domain::Knowledge], vec![1.0, 0.5]);
    index
}

#[tokio::test]
async fn results_are_ordered_by_descending_score() {
    let index = sample_index();
    let hits = index.search(&[1.0, 0.0], None, 10).await.unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["k1", "k2", "kp", "p1"]);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn domain_filter_restricts_results() {
    let index = sample_index();
    let hits = index
        .search(&[1.0, 1.0], Some(Domain::Personality), 10)
        .await
        .unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    // Multi-domain points match any of their tags.
    assert_eq!(ids, vec!["kp", "p1"]);
}

#[tokio::test]
async fn top_k_truncates() {
    let index = sample_index();
    let hits = index.search(&[1.0, 0.0], None, 2).await.unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn ties_keep_insertion_order() {
    let mut index = MemoryIndex::new();
    // Same direction, so identical cosine scores.
    index.insert("first", vec![Domain::Knowledge], vec![2.0, 0.0]);
    index.insert("second", vec![Domain::Knowledge], vec![1.0, 0.0]);
    index.insert("third", vec![Domain::Knowledge], vec![4.0, 0.0]);

    let hits = index.search(&[1.0, 0.0], None, 10).await.unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn zero_or_mismatched_vectors_score_zero() {
    let mut index = MemoryIndex::new();
    index.insert("zero", vec![Domain::Knowledge], vec![0.0, 0.0]);
    index.insert("short", vec![Domain::Knowledge], vec![1.0]);

    let hits = index.search(&[1.0, 0.0], None, 10).await.unwrap();
    assert!(hits.iter().all(|h| h.score == 0.0));
}
