//! End-to-end tests through the `eql` facade

use eql::cluster::{
    ClusterError, ClusterResult, ConnectionInfo, SearchRequest, SearchResponse, Transport,
};
use eql::diagnostics::{EQL0006, EQL0100, EQL0302};
use eql::{check_source, ConnectivePolicy, EngineOptions, Session, StatementOutcome};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

/// Records bodies and answers with a fixed result
#[derive(Default)]
struct Recorder {
    bodies: Mutex<Vec<serde_json::Value>>,
    failure: Mutex<Option<ClusterError>>,
}

impl Transport for Recorder {
    fn execute(
        &self,
        _connection: &ConnectionInfo,
        request: &SearchRequest,
    ) -> ClusterResult<SearchResponse> {
        self.bodies.lock().push(request.to_body());
        match self.failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(SearchResponse::default()),
        }
    }

    fn name(&self) -> &str {
        "recorder"
    }
}

fn session(policy: ConnectivePolicy) -> (Session, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let session = Session::new(
        EngineOptions {
            connective_policy: policy,
        },
        recorder.clone(),
    );
    (session, recorder)
}

#[test]
fn test_script_sends_one_request_per_query() {
    let (mut session, recorder) = session(ConnectivePolicy::AndWins);
    let outcomes = session
        .run(
            r#"
            connect es1:9200, es2:9200 cluster prod;
            query logs fields ts, msg where (level="ERROR" or level="WARN") and code=500 return 10, 20;
            query metrics sort ts desc;
            "#,
        )
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], StatementOutcome::Connected { .. }));
    let bodies = recorder.bodies.lock();
    assert_eq!(
        bodies[0],
        serde_json::json!({
            "query": {"bool": {
                "must": {"match_all": {}},
                "filter": {"bool": {"must": [
                    {"term": {"code": 500}},
                    {"bool": {
                        "should": [
                            {"term": {"level": "WARN"}},
                            {"term": {"level": "ERROR"}}
                        ],
                        "minimum_should_match": 1
                    }}
                ]}}
            }},
            "_source": ["ts", "msg"],
            "size": 10,
            "from": 20
        })
    );
    assert_eq!(
        bodies[1],
        serde_json::json!({
            "query": {"bool": {"must": {"match_all": {}}}},
            "sort": [{"ts": {"order": "desc"}}]
        })
    );
}

#[rstest]
#[case(ConnectivePolicy::AndWins, true)]
#[case(ConnectivePolicy::RequireParentheses, false)]
fn test_mixed_connectives_follow_policy(#[case] policy: ConnectivePolicy, #[case] runs: bool) {
    let (mut session, recorder) = session(policy);
    let result = session.run("connect h:9200; query t where a=1 and b=2 or c=3");
    assert_eq!(result.is_ok(), runs);
    assert_eq!(recorder.bodies.lock().len(), usize::from(runs));
    if let Err(error) = result {
        assert_eq!(error.code(), EQL0100);
        assert_eq!(error.location().unwrap().line, 1);
    }
}

#[test]
fn test_cluster_error_keeps_its_code() {
    let (mut session, recorder) = session(ConnectivePolicy::AndWins);
    *recorder.failure.lock() = Some(ClusterError::Status {
        status: 400,
        reason: "parse_exception".into(),
    });
    let err = session.run("connect h:9200;\nquery t").unwrap_err();
    assert_eq!(err.code(), EQL0302);
    assert_eq!(err.location().unwrap().line, 2);
    assert!(err.to_diagnostic().message.contains("parse_exception"));
}

#[test]
fn test_check_matches_run_for_parse_errors() {
    let source = "connect h:9200 query t";
    let report = check_source(source, EngineOptions::default());
    let (mut session, _) = session(ConnectivePolicy::AndWins);
    let err = session.run(source).unwrap_err();

    assert_eq!(err.code(), EQL0006);
    assert_eq!(report.diagnostics[0].code, EQL0006);
}
