mod common;

use assert2::check;
use common::{core_modules, loaded_session};
use rstest::rstest;
use sigsearch::config::SearchConfig;
use sigsearch::{Metric, RawModuleDocs, SearchSession};

fn names(results: &[sigsearch::RankedEntry]) -> Vec<&str> {
    results.iter().map(|r| r.entry.name.name.as_str()).collect()
}

/// Test: A lowercase word is a name search, in index order.
#[tokio::test(flavor = "multi_thread")]
async fn name_search_keeps_index_order() {
    let session = loaded_session().await;
    let results = session.search("ma", 20).await.unwrap().unwrap();
    let found = names(&results);

    check!(found.starts_with(&["map", "filterMap"]));
    check!(!found.contains(&"sum"));
    check!(results.iter().all(|r| r.score.is_none()));
}

/// Test: Type search ranks exact variable use above instantiations.
#[tokio::test(flavor = "multi_thread")]
async fn type_search_ranks_by_similarity() {
    let session = loaded_session().await;
    let results = session.search("a -> a", 20).await.unwrap().unwrap();

    check!(names(&results) == ["identity", "negate", "toString"]);
    let scores: Vec<i32> = results.iter().filter_map(|r| r.score).collect();
    check!(scores.windows(2).all(|w| w[0] >= w[1]));
}

/// Test: Variable names in the query don't affect ranking.
#[rstest]
#[case("a -> a")]
#[case("x -> x")]
#[case("elem -> elem")]
#[tokio::test(flavor = "multi_thread")]
async fn type_search_ignores_variable_names(#[case] query: &str) {
    let session = loaded_session().await;
    let results = session.search(query, 20).await.unwrap().unwrap();
    check!(names(&results) == ["identity", "negate", "toString"]);
}

/// Test: Higher-order signatures find map before filterMap.
#[tokio::test(flavor = "multi_thread")]
async fn type_search_finds_higher_order_functions() {
    let session = loaded_session().await;
    let results = session
        .search("(x -> y) -> List x -> List y", 20)
        .await
        .unwrap()
        .unwrap();

    check!(names(&results).first() == Some(&"map"));
    check!(names(&results).contains(&"filterMap"));
}

/// Test: The limit truncates without changing order.
#[tokio::test(flavor = "multi_thread")]
async fn limit_truncates_results() {
    let session = loaded_session().await;
    let results = session.search("a -> a", 2).await.unwrap().unwrap();
    check!(names(&results) == ["identity", "negate"]);
}

/// Test: A repeated query is served from cache with the same results.
#[tokio::test(flavor = "multi_thread")]
async fn repeated_query_is_stable() {
    let session = loaded_session().await;
    let first = session.search("a -> a", 20).await.unwrap();
    let second = session.search("  a -> a  ", 20).await.unwrap();
    check!(first == second);
}

/// Test: Blank queries return nothing.
#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test(flavor = "multi_thread")]
async fn blank_query_returns_nothing(#[case] query: &str) {
    let session = loaded_session().await;
    check!(session.search(query, 20).await.unwrap() == Some(vec![]));
}

/// Test: The distance metric ranks identical signatures first with score 0.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn distance_metric_ranks_ascending(core_modules: Vec<RawModuleDocs>) {
    let session = SearchSession::new(&SearchConfig {
        metric: Metric::Distance,
        ..SearchConfig::default()
    });
    session
        .load_package(common::core_package(), core_modules)
        .await
        .unwrap();

    let results = session.search("Int -> Int", 20).await.unwrap().unwrap();
    check!(names(&results) == ["negate", "toString", "map", "filterMap", "head"]);
    check!(results[0].score == Some(0));
    check!(!names(&results).contains(&"identity"));
    let scores: Vec<i32> = results.iter().filter_map(|r| r.score).collect();
    check!(scores.windows(2).all(|w| w[0] <= w[1]));
}

/// Test: Deeply nested queries degrade to a name search instead of failing.
#[rstest]
#[case(500)]
#[case(20_000)]
#[tokio::test(flavor = "multi_thread")]
async fn deeply_nested_query_is_answered(#[case] depth: usize) {
    let session = loaded_session().await;
    let query = format!("List {}a{}", "(List ".repeat(depth), ")".repeat(depth));

    check!(session.search(&query, 20).await.unwrap() == Some(vec![]));
    check!(names(&session.search("a -> a", 20).await.unwrap().unwrap()) == ["identity", "negate", "toString"]);
}
