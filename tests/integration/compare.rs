//! Multi-repository lookups and history comparison

use serde_json::json;
use stargazers::compare::{fetch_histories, format_info_table, load_repo_infos};
use stargazers::downloader::StarAggregator;
use stargazers::fetcher::FetcherError;
use stargazers::RepoName;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::support::{mock_client, repo_body, star_page};

async fn mount_repo(server: &MockServer, full_name: &str, stars: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{full_name}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_body(full_name, stars)))
        .mount(server)
        .await;
}

fn names(list: &str) -> Vec<RepoName> {
    RepoName::parse_list(list).unwrap()
}

#[tokio::test]
async fn test_infos_ranked_by_stars() {
    let server = MockServer::start().await;
    mount_repo(&server, "apache/kafka", 20).await;
    mount_repo(&server, "minio/minio", 300).await;
    mount_repo(&server, "mongodb/mongo", 150).await;

    let (client, _, _) = mock_client(&server.uri(), 100);
    let infos = load_repo_infos(&client, &names("apache/kafka,minio/minio,mongodb/mongo"))
        .await
        .unwrap();

    let table = format_info_table(&infos);
    assert_eq!(
        table,
        "minio/minio   : 300\nmongodb/mongo : 150\napache/kafka  : 20\n"
    );
}

#[tokio::test]
async fn test_unknown_repo_aborts_lookup() {
    let server = MockServer::start().await;
    mount_repo(&server, "apache/kafka", 20).await;
    Mock::given(method("GET"))
        .and(path("/repos/nobody/nothing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let (client, _, _) = mock_client(&server.uri(), 100);
    let result = load_repo_infos(&client, &names("apache/kafka,nobody/nothing")).await;

    assert!(matches!(
        result,
        Err(FetcherError::RemoteApi { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_failing_history_is_empty_and_others_survive() {
    let server = MockServer::start().await;
    mount_repo(&server, "good/repo", 3).await;
    mount_repo(&server, "bad/repo", 3).await;
    Mock::given(method("GET"))
        .and(path("/repos/good/repo/stargazers"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(star_page(0, 3)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/bad/repo/stargazers"))
        .respond_with(ResponseTemplate::new(500).set_body_string("broken"))
        .mount(&server)
        .await;

    let (client, config, _) = mock_client(&server.uri(), 100);
    let infos = load_repo_infos(&client, &names("bad/repo,good/repo"))
        .await
        .unwrap();
    let aggregator = StarAggregator::new(client, config);

    let histories = fetch_histories(&aggregator, &infos).await;

    assert_eq!(histories.len(), 2);
    let good = histories
        .iter()
        .find(|h| h.info.full_name == "good/repo")
        .unwrap();
    let bad = histories
        .iter()
        .find(|h| h.info.full_name == "bad/repo")
        .unwrap();
    assert_eq!(good.events.len(), 3);
    assert!(bad.events.is_empty());
}
