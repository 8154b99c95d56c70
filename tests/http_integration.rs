//! Integration tests for the TFE client using wiremock
//!
//! These tests verify request shape (auth, media type, JSON:API bodies) and
//! response handling (status mapping, pagination) against mocked endpoints.

use serde_json::{json, Value};
use std::sync::Arc;
use tfe_runtask::provider::Provider;
use tfe_runtask::resource::{lifecycle, Resource, WorkspaceRunTaskModel};
use tfe_runtask::tfe::models::{EnforcementLevel, Stage, VariableCategory};
use tfe_runtask::tfe::test_variables::{
    create_test_variable, delete_test_variable, list_test_variables, read_test_variable,
    RegistryModuleId, VariableCreateOptions,
};
use tfe_runtask::tfe::workspace_run_tasks::{
    create_workspace_run_task, delete_workspace_run_task, list_workspace_run_tasks,
    read_workspace_run_task, update_workspace_run_task, WorkspaceRunTaskCreateOptions,
    WorkspaceRunTaskUpdateOptions,
};
use tfe_runtask::tfe::{organizations, run_tasks, workspaces, TfeClient, TfeError};
use wiremock::matchers::{bearer_token, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn client_for(server: &MockServer) -> TfeClient {
    TfeClient::new(&server.uri(), TOKEN, false).unwrap()
}

fn wstask_doc(id: &str, level: &str, stage: &str) -> Value {
    json!({
        "data": {
            "id": id,
            "type": "workspace-tasks",
            "attributes": {"enforcement-level": level, "stage": stage},
            "relationships": {
                "task": {"data": {"id": "task-abc", "type": "tasks"}},
                "workspace": {"data": {"id": "ws-123", "type": "workspaces"}}
            }
        }
    })
}

fn jsonapi(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/vnd.api+json")
        .set_body_json(body)
}

mod http_client_tests {
    use super::*;

    /// GET carries the bearer token and JSON:API accept header
    #[tokio::test]
    async fn test_read_sends_auth_and_accept() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/workspaces/ws-123/tasks/wstask-1"))
            .and(bearer_token(TOKEN))
            .and(header("accept", "application/vnd.api+json"))
            .respond_with(jsonapi(wstask_doc("wstask-1", "advisory", "pre_plan")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let wstask = read_workspace_run_task(&client, "ws-123", "wstask-1")
            .await
            .unwrap();

        assert_eq!(wstask.id, "wstask-1");
        assert_eq!(wstask.enforcement_level, EnforcementLevel::Advisory);
        assert_eq!(wstask.stage, Stage::PrePlan);
        assert_eq!(wstask.run_task.as_deref(), Some("task-abc"));
    }

    /// 404 maps to NotFound
    #[tokio::test]
    async fn test_404_returns_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/workspaces/ws-missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"errors": [{"status": "404", "title": "not found"}]})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = workspaces::read_workspace_by_id(&client, "ws-missing")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    /// 401 maps to Unauthorized
    #[tokio::test]
    async fn test_401_returns_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/tasks/task-abc"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"errors": [{"status": "401", "title": "unauthorized"}]})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = run_tasks::read_run_task(&client, "task-abc").await.unwrap_err();

        assert!(matches!(err, TfeError::Unauthorized));
    }

    /// 422 keeps the JSON:API error messages
    #[tokio::test]
    async fn test_422_includes_error_details() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/workspaces/ws-123/tasks"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "errors": [{
                    "status": "422",
                    "title": "invalid attribute",
                    "detail": "Task has already been taken"
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = WorkspaceRunTaskCreateOptions {
            run_task_id: "task-abc".to_string(),
            enforcement_level: EnforcementLevel::Mandatory,
            stage: None,
        };
        let err = create_workspace_run_task(&client, "ws-123", &options)
            .await
            .unwrap_err();

        match err {
            TfeError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "invalid attribute: Task has already been taken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// 5xx with a non-JSON body still produces an error
    #[tokio::test]
    async fn test_500_plain_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/workspaces/ws-123"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = workspaces::read_workspace_by_id(&client, "ws-123")
            .await
            .unwrap_err();

        assert!(matches!(err, TfeError::Api { status: 502, .. }));
    }

    /// Malformed success bodies are decode errors
    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/tasks/task-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = run_tasks::read_run_task(&client, "task-abc").await.unwrap_err();

        assert!(matches!(err, TfeError::Decode(_)));
    }
}

mod request_body_tests {
    use super::*;

    /// Create posts a workspace-tasks document with the task relationship
    #[tokio::test]
    async fn test_create_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v2/workspaces/ws-123/tasks"))
            .and(header("content-type", "application/vnd.api+json"))
            .and(body_json(json!({
                "data": {
                    "type": "workspace-tasks",
                    "attributes": {"enforcement-level": "mandatory", "stage": "pre_apply"},
                    "relationships": {
                        "task": {"data": {"id": "task-abc", "type": "tasks"}}
                    }
                }
            })))
            .respond_with(jsonapi(wstask_doc("wstask-9", "mandatory", "pre_apply")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = WorkspaceRunTaskCreateOptions {
            run_task_id: "task-abc".to_string(),
            enforcement_level: EnforcementLevel::Mandatory,
            stage: Some(Stage::PreApply),
        };
        let wstask = create_workspace_run_task(&client, "ws-123", &options)
            .await
            .unwrap();

        assert_eq!(wstask.id, "wstask-9");
        assert_eq!(wstask.stage, Stage::PreApply);
    }

    /// Update without a stage leaves it out of the request
    #[tokio::test]
    async fn test_update_body_omits_absent_stage() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/v2/workspaces/ws-123/tasks/wstask-1"))
            .and(body_json(json!({
                "data": {
                    "type": "workspace-tasks",
                    "attributes": {"enforcement-level": "advisory"}
                }
            })))
            .respond_with(jsonapi(wstask_doc("wstask-1", "advisory", "post_plan")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = WorkspaceRunTaskUpdateOptions {
            enforcement_level: EnforcementLevel::Advisory,
            stage: None,
        };
        let wstask = update_workspace_run_task(&client, "ws-123", "wstask-1", &options)
            .await
            .unwrap();

        assert_eq!(wstask.enforcement_level, EnforcementLevel::Advisory);
    }

    /// Delete accepts an empty 204 response
    #[tokio::test]
    async fn test_delete_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v2/workspaces/ws-123/tasks/wstask-1"))
            .and(bearer_token(TOKEN))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        delete_workspace_run_task(&client, "ws-123", "wstask-1")
            .await
            .unwrap();
    }

    /// Names are percent-encoded into path segments
    #[tokio::test]
    async fn test_workspace_name_is_encoded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/organizations/acme/workspaces/my%20ws"))
            .respond_with(jsonapi(json!({
                "data": {"id": "ws-123", "type": "workspaces", "attributes": {"name": "my ws"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let workspace = workspaces::read_workspace(&client, "acme", "my ws")
            .await
            .unwrap();

        assert_eq!(workspace.id, "ws-123");
        assert_eq!(workspace.name, "my ws");
    }
}

mod pagination_tests {
    use super::*;

    fn page(ids: &[&str], current: u32, next: Option<u32>) -> Value {
        let data: Vec<Value> = ids
            .iter()
            .map(|id| {
                json!({
                    "id": id,
                    "type": "workspace-tasks",
                    "attributes": {"enforcement-level": "advisory", "stage": "post_plan"},
                    "relationships": {
                        "task": {"data": {"id": format!("task-{id}"), "type": "tasks"}}
                    }
                })
            })
            .collect();
        json!({
            "data": data,
            "meta": {"pagination": {"current-page": current, "next-page": next}}
        })
    }

    /// List follows next-page until it runs out
    #[tokio::test]
    async fn test_list_follows_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/workspaces/ws-123/tasks"))
            .and(query_param("page[number]", "1"))
            .and(query_param("page[size]", "100"))
            .respond_with(jsonapi(page(&["wstask-1", "wstask-2"], 1, Some(2))))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v2/workspaces/ws-123/tasks"))
            .and(query_param("page[number]", "2"))
            .respond_with(jsonapi(page(&["wstask-3"], 2, None)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let tasks = list_workspace_run_tasks(&client, "ws-123").await.unwrap();

        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["wstask-1", "wstask-2", "wstask-3"]);
        assert_eq!(tasks[2].run_task.as_deref(), Some("task-wstask-3"));
    }

    /// A response without meta is a single page
    #[tokio::test]
    async fn test_list_without_meta() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/organizations/acme/tasks"))
            .respond_with(jsonapi(json!({
                "data": [{"id": "task-abc", "type": "tasks", "attributes": {"name": "scan"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let tasks = run_tasks::list_run_tasks(&client, "acme").await.unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "scan");
    }
}

mod cleanup_endpoint_tests {
    use super::*;

    /// Organizations are addressed by name
    #[tokio::test]
    async fn test_read_organization() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/organizations/acme"))
            .and(bearer_token(TOKEN))
            .respond_with(jsonapi(json!({
                "data": {
                    "id": "acme",
                    "type": "organizations",
                    "attributes": {
                        "email": "admin@company.com",
                        "created-at": "2024-05-01T12:00:00.000Z"
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let org = organizations::read_organization(&client, "acme").await.unwrap();

        assert_eq!(org.name, "acme");
        assert_eq!(org.email.as_deref(), Some("admin@company.com"));
        assert!(org.created_at.is_some());
    }

    /// Workspaces are deleted by id
    #[tokio::test]
    async fn test_delete_workspace() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v2/workspaces/ws-123"))
            .and(bearer_token(TOKEN))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        workspaces::delete_workspace(&client, "ws-123").await.unwrap();
    }

    /// Run tasks are deleted by id; a missing one surfaces NotFound
    #[tokio::test]
    async fn test_delete_run_task() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v2/tasks/task-abc"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/v2/tasks/task-gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        run_tasks::delete_run_task(&client, "task-abc").await.unwrap();
        let err = run_tasks::delete_run_task(&client, "task-gone")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

mod test_variable_tests {
    use super::*;

    const VARS_PATH: &str =
        "/api/v2/organizations/acme/tests/registry-modules/private/acme/network/aws/vars";

    fn module() -> RegistryModuleId {
        "acme/network/aws".parse().unwrap()
    }

    fn variable(id: &str, key: &str) -> Value {
        json!({
            "id": id,
            "type": "vars",
            "attributes": {
                "key": key,
                "value": "value_test",
                "description": "some description",
                "category": "env",
                "hcl": false,
                "sensitive": false
            }
        })
    }

    /// Create posts a vars document with every attribute
    #[tokio::test]
    async fn test_create_test_variable_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(VARS_PATH))
            .and(header("content-type", "application/vnd.api+json"))
            .and(body_json(json!({
                "data": {
                    "type": "vars",
                    "attributes": {
                        "key": "key_test",
                        "value": "value_test",
                        "description": "some description",
                        "category": "env",
                        "hcl": false,
                        "sensitive": false
                    }
                }
            })))
            .respond_with(jsonapi(json!({"data": variable("var-1", "key_test")})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = VariableCreateOptions {
            key: "key_test".to_string(),
            value: "value_test".to_string(),
            description: "some description".to_string(),
            category: VariableCategory::Env,
            hcl: false,
            sensitive: false,
        };
        let created = create_test_variable(&client, &module(), &options)
            .await
            .unwrap();

        assert_eq!(created.id, "var-1");
        assert_eq!(created.category, VariableCategory::Env);
    }

    /// Read scans the list; a miss is NotFound
    #[tokio::test]
    async fn test_read_test_variable_scans_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(VARS_PATH))
            .respond_with(jsonapi(json!({
                "data": [variable("var-1", "other"), variable("var-2", "key_test")]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let all = list_test_variables(&client, &module()).await.unwrap();
        assert_eq!(all.len(), 2);

        let found = read_test_variable(&client, &module(), "var-2").await.unwrap();
        assert_eq!(found.key, "key_test");
        assert_eq!(found.value, "value_test");
        assert_eq!(found.description, "some description");
        assert!(!found.hcl);
        assert!(!found.sensitive);

        let err = read_test_variable(&client, &module(), "var-missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    /// Delete addresses the variable under the module's vars path
    #[tokio::test]
    async fn test_delete_test_variable() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(format!("{}/var-1", VARS_PATH)))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        delete_test_variable(&client, &module(), "var-1").await.unwrap();
    }
}

mod resource_tests {
    use super::*;

    async fn mount_import_fixtures(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/v2/organizations/acme/workspaces/prod"))
            .respond_with(jsonapi(json!({
                "data": {"id": "ws-123", "type": "workspaces", "attributes": {"name": "prod"}}
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v2/organizations/acme/tasks"))
            .respond_with(jsonapi(json!({
                "data": [
                    {"id": "task-other", "type": "tasks", "attributes": {"name": "lint"}},
                    {"id": "task-abc", "type": "tasks", "attributes": {"name": "scan"}}
                ]
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v2/workspaces/ws-123/tasks"))
            .respond_with(jsonapi(json!({
                "data": [wstask_doc("wstask-1", "mandatory", "pre_apply")["data"].clone()]
            })))
            .mount(server)
            .await;
    }

    /// Import resolves names to ids through three lookups
    #[tokio::test]
    async fn test_import_against_service() {
        let server = MockServer::start().await;
        mount_import_fixtures(&server).await;

        let provider = Provider::new(Arc::new(client_for(&server)));
        let resource = provider.workspace_run_task();
        let state = lifecycle::import(&resource, "acme/prod/scan").await.unwrap();

        let model: WorkspaceRunTaskModel = resource.model_from_state(&state).unwrap();
        assert_eq!(model.id.as_deref(), Some("wstask-1"));
        assert_eq!(model.workspace_id, "ws-123");
        assert_eq!(model.task_id, "task-abc");
        assert_eq!(model.enforcement_level, EnforcementLevel::Mandatory);
        assert_eq!(model.stage, Some(Stage::PreApply));
    }

    /// Import of an unknown task name reports not found
    #[tokio::test]
    async fn test_import_unknown_task() {
        let server = MockServer::start().await;
        mount_import_fixtures(&server).await;

        let provider = Provider::new(Arc::new(client_for(&server)));
        let err = provider
            .workspace_run_task()
            .import_state("acme/prod/missing")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    /// Refresh drops state when the association is gone
    #[tokio::test]
    async fn test_refresh_after_remote_delete() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/workspaces/ws-123/tasks/wstask-1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider = Provider::new(Arc::new(client_for(&server)));
        let state = json!({
            "id": "wstask-1",
            "workspace_id": "ws-123",
            "task_id": "task-abc",
            "enforcement_level": "advisory",
            "stage": "post_plan"
        });
        let refreshed = lifecycle::refresh(&provider.workspace_run_task(), &state)
            .await
            .unwrap();

        assert!(refreshed.is_none());
    }
}
