use anyhow::{Context, Result};
use companion_application::{CompanionWidget, OpenChatOutcome, SessionController};
use companion_core::chat::{ChatRecord, ChatRepository, HistoryFilter};
use companion_core::course::Course;
use companion_core::error::CompanionError;
use companion_core::session::View;
use companion_infrastructure::InMemoryChatRepository;
use companion_infrastructure::fixtures::repository_from_fixture;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;

/// A replay script: a list of `[[step]]` tables run in order.
#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default, rename = "step")]
    steps: Vec<Step>,
}

/// One user action, in the words a UI would use.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Step {
    OpenPanel { view: View },
    ClosePanel,
    ToggleMenu,
    SelectCourse { id: String, title: String },
    RemoveCourse { id: String },
    ClearCourses,
    StartDiscovery,
    FocusCourse { id: String },
    CreateChat {
        #[serde(default)]
        title: String,
    },
    OpenChat { chat_id: String },
    RequestOpenChat { chat_id: String },
    ContinueOriginal,
    StartNew {
        #[serde(default)]
        title: String,
    },
    Cancel,
    History {
        #[serde(default)]
        filter: Option<HistoryFilter>,
    },
    RecordMessage { chat_id: String, text: String },
}

pub async fn run(
    config_dir: Option<PathBuf>,
    fixture: Option<PathBuf>,
    script_path: PathBuf,
) -> Result<()> {
    let config = super::config::service(config_dir)?.get_config()?;

    let repository: Arc<dyn ChatRepository> = match fixture {
        Some(path) => Arc::new(
            repository_from_fixture(&path)
                .await
                .with_context(|| format!("Failed to load fixture {}", path.display()))?,
        ),
        None => Arc::new(InMemoryChatRepository::new()),
    };

    let content = std::fs::read_to_string(&script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let script: Script = toml::from_str(&content)
        .with_context(|| format!("Failed to parse script {}", script_path.display()))?;

    let mut widget = CompanionWidget::new();
    widget.init(config, repository)?;
    tracing::info!(steps = script.steps.len(), "Replaying script");

    for (index, step) in script.steps.into_iter().enumerate() {
        let label = format!("{:?}", step);
        let session = widget.session_mut()?;
        let report = match run_step(session, step).await {
            Ok(result) => json!({ "step": index + 1, "action": label, "ok": result }),
            // Recoverable errors are what the UI would render; keep going.
            Err(err) if err.is_recoverable() => {
                json!({ "step": index + 1, "action": label, "error": err })
            }
            Err(err) => return Err(err).with_context(|| format!("Step {} failed", index + 1)),
        };
        println!("{}", serde_json::to_string(&report)?);
    }

    let state = widget.session()?.state();
    println!("{}", serde_json::to_string_pretty(state)?);
    widget.destroy();
    Ok(())
}

async fn run_step(
    session: &mut SessionController,
    step: Step,
) -> std::result::Result<Value, CompanionError> {
    let value = match step {
        Step::OpenPanel { view } => {
            session.open_panel(view)?;
            Value::Null
        }
        Step::ClosePanel => {
            session.close_panel()?;
            Value::Null
        }
        Step::ToggleMenu => {
            session.toggle_menu()?;
            json!({ "menu_open": session.state().is_menu_open() })
        }
        Step::SelectCourse { id, title } => {
            session.select_course(Course::new(id, title))?;
            Value::Null
        }
        Step::RemoveCourse { id } => json!({ "removed": session.remove_course(&id)? }),
        Step::ClearCourses => {
            session.clear_courses()?;
            Value::Null
        }
        Step::StartDiscovery => {
            session.start_discovery()?;
            Value::Null
        }
        Step::FocusCourse { id } => json!({ "focused": session.focus_course(&id)? }),
        Step::CreateChat { title } => chat_summary(&session.create_new_chat(&title).await?),
        Step::OpenChat { chat_id } => json!({ "opened": session.open_chat(&chat_id, None).await? }),
        Step::RequestOpenChat { chat_id } => match session.request_open_chat(&chat_id).await? {
            OpenChatOutcome::Opened { chat_id } => json!({ "opened": chat_id }),
            OpenChatOutcome::AwaitingChoice(pending) => json!({
                "prompt": pending.chat.chat_id,
                "relation": pending.relation,
                "warning": pending.warning,
            }),
            OpenChatOutcome::NotFound => json!({ "not_found": chat_id }),
        },
        Step::ContinueOriginal => json!({ "opened": session.continue_with_original().await? }),
        Step::StartNew { title } => chat_summary(&session.start_new_instead(&title).await?),
        Step::Cancel => {
            session.cancel_choice()?;
            Value::Null
        }
        Step::History { filter } => {
            let chats = session.history(filter).await?;
            Value::Array(chats.iter().map(chat_summary).collect())
        }
        Step::RecordMessage { chat_id, text } => {
            match session.record_message(&chat_id, &text).await? {
                Some(chat) => chat_summary(&chat),
                None => json!({ "not_found": chat_id }),
            }
        }
    };
    Ok(value)
}

fn chat_summary(chat: &ChatRecord) -> Value {
    let courses: Vec<&str> = chat.course_context().iter().map(|c| c.id.as_str()).collect();
    json!({
        "chat_id": chat.chat_id,
        "title": chat.title,
        "courses": courses,
        "message_count": chat.message_count,
        "last_activity": chat.last_activity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script: Script = toml::from_str(
            r#"
            [[step]]
            action = "select_course"
            id = "py101"
            title = "Python 101"

            [[step]]
            action = "open_panel"
            view = "chat"

            [[step]]
            action = "history"
            filter = "exact"

            [[step]]
            action = "cancel"
            "#,
        )
        .unwrap();
        assert_eq!(script.steps.len(), 4);
        assert!(matches!(script.steps[1], Step::OpenPanel { view: View::Chat }));
        assert!(matches!(
            script.steps[2],
            Step::History {
                filter: Some(HistoryFilter::Exact)
            }
        ));
    }

    #[tokio::test]
    async fn test_run_step_reports_prompt() {
        let mut widget = CompanionWidget::new();
        widget.init_in_memory(Default::default()).unwrap();
        let session = widget.session_mut().unwrap();

        run_step(
            session,
            Step::SelectCourse {
                id: "py101".to_string(),
                title: "Python 101".to_string(),
            },
        )
        .await
        .unwrap();
        let created = run_step(session, Step::CreateChat { title: "Loops".to_string() })
            .await
            .unwrap();
        assert_eq!(created["courses"], json!(["py101"]));

        let missing = run_step(
            session,
            Step::RequestOpenChat {
                chat_id: "nope".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(missing, json!({ "not_found": "nope" }));
    }
}
