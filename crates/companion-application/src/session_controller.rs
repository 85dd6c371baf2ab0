use chrono::Utc;
use companion_core::chat::{
    ChatRecord, ChatRepository, HistoryFilter, PendingChatChoice, PrimaryCoursePolicy,
    filter_history,
};
use companion_core::config::WidgetConfig;
use companion_core::course::Course;
use companion_core::error::{CompanionError, Result};
use companion_core::session::{
    ChatChoice, SessionEffect, SessionEvent, SessionState, Transition, View, reduce,
};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

/// How a click on a history entry was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenChatOutcome {
    /// The chat is now active.
    Opened { chat_id: String },
    /// The user has to pick continue-original or start-new first.
    AwaitingChoice(PendingChatChoice),
    /// The repository does not know the chat; nothing changed.
    NotFound,
}

/// Single writer of the widget session.
///
/// `SessionController` is responsible for:
/// - Feeding UI events through the pure reducer
/// - Persisting chats created by a transition before committing it
/// - Resolving chat records through the injected repository
/// - Publishing every committed state to read-only subscribers
///
/// Every method takes `&mut self`: one event is reduced and committed
/// before the next one starts, so transitions never interleave.
pub struct SessionController {
    state: SessionState,
    repository: Arc<dyn ChatRepository>,
    policy: PrimaryCoursePolicy,
    history_filter: HistoryFilter,
    publisher: watch::Sender<SessionState>,
}

impl SessionController {
    /// Creates a controller with the initial state described by `config`.
    pub fn new(repository: Arc<dyn ChatRepository>, config: &WidgetConfig) -> Self {
        let state = SessionState::initial(config.initial_view, config.open_menu_on_init);
        let (publisher, _) = watch::channel(state.clone());
        Self {
            state,
            repository,
            policy: config.primary_course,
            history_filter: config.history_filter,
            publisher,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Subscribes to committed states. The receiver starts at the current
    /// state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.publisher.subscribe()
    }

    pub fn policy(&self) -> PrimaryCoursePolicy {
        self.policy
    }

    pub fn history_filter(&self) -> HistoryFilter {
        self.history_filter
    }

    /// Applies policy settings from a new config. Selection, active chat and
    /// open panel are left alone.
    pub fn apply_config(&mut self, config: &WidgetConfig) {
        self.policy = config.primary_course;
        self.history_filter = config.history_filter;
    }

    // ============================================================================
    // Event dispatch
    // ============================================================================

    /// Reduces `event` and commits the result.
    ///
    /// A chat created by the transition is saved first; if saving fails the
    /// state is not committed.
    pub async fn dispatch(&mut self, event: SessionEvent) -> Result<Vec<SessionEffect>> {
        tracing::debug!(?event, "Dispatching session event");
        let transition = reduce(&self.state, event, self.policy)?;

        if let Some(chat) = transition.created_chat() {
            self.repository.save_chat(chat).await?;
            tracing::info!(
                chat_id = %chat.chat_id,
                courses = chat.course_context().len(),
                "Created chat"
            );
        }

        self.commit(&transition);
        Ok(transition.effects)
    }

    /// Reduces an event that cannot create a chat, without touching the
    /// repository.
    fn apply_local(&mut self, event: SessionEvent) -> Result<Transition> {
        tracing::debug!(?event, "Applying session event");
        let transition = reduce(&self.state, event, self.policy)?;
        debug_assert!(transition.created_chat().is_none());
        self.commit(&transition);
        Ok(transition)
    }

    fn commit(&mut self, transition: &Transition) {
        for effect in &transition.effects {
            match effect {
                SessionEffect::Ignored { reason } => {
                    tracing::warn!(%reason, "Session event ignored");
                }
                SessionEffect::ChatOpened { chat_id } => {
                    tracing::info!(%chat_id, "Opened chat");
                }
                SessionEffect::PromptUser { pending } => {
                    tracing::info!(
                        chat_id = %pending.chat.chat_id,
                        relation = %pending.relation,
                        "Chat context differs from selection, prompting"
                    );
                }
                SessionEffect::PromptDismissed { chat_id } => {
                    tracing::debug!(%chat_id, "Chat prompt dismissed");
                }
                SessionEffect::ChatCreated { .. } => {}
            }
        }

        if transition.state != self.state {
            self.state = transition.state.clone();
            self.publisher.send_replace(transition.state.clone());
        }
    }

    // ============================================================================
    // Panels and selection
    // ============================================================================

    pub fn open_panel(&mut self, view: View) -> Result<()> {
        self.apply_local(SessionEvent::OpenPanel { view }).map(drop)
    }

    pub fn close_panel(&mut self) -> Result<()> {
        self.apply_local(SessionEvent::ClosePanel).map(drop)
    }

    pub fn toggle_menu(&mut self) -> Result<()> {
        self.apply_local(SessionEvent::ToggleMenu).map(drop)
    }

    pub fn select_course(&mut self, course: Course) -> Result<()> {
        self.apply_local(SessionEvent::SelectCourse { course }).map(drop)
    }

    /// Removes a course. Returns `false` if it was not selected.
    pub fn remove_course(&mut self, course_id: &str) -> Result<bool> {
        let transition = self.apply_local(SessionEvent::RemoveCourse {
            course_id: course_id.to_string(),
        })?;
        Ok(!transition.was_ignored())
    }

    pub fn clear_courses(&mut self) -> Result<()> {
        self.apply_local(SessionEvent::ClearCourses).map(drop)
    }

    pub fn start_discovery(&mut self) -> Result<()> {
        self.apply_local(SessionEvent::StartDiscovery).map(drop)
    }

    /// Focuses a selected course. Returns `false` if it is not selected.
    pub fn focus_course(&mut self, course_id: &str) -> Result<bool> {
        let transition = self.apply_local(SessionEvent::FocusCourse {
            course_id: course_id.to_string(),
        })?;
        Ok(!transition.was_ignored())
    }

    // ============================================================================
    // Chats
    // ============================================================================

    /// Creates a chat over the current selection and makes it active.
    ///
    /// # Errors
    ///
    /// `InvalidState` when no course is selected; route to discovery first.
    pub async fn create_new_chat(&mut self, title: &str) -> Result<ChatRecord> {
        let effects = self
            .dispatch(SessionEvent::CreateNewChat {
                chat_id: new_chat_id(),
                title: title.to_string(),
                at: Utc::now(),
            })
            .await?;
        created_chat(effects)
    }

    /// Activates a chat without reconciling contexts.
    ///
    /// Returns `false` (and changes nothing) when the chat does not exist.
    pub async fn open_chat(
        &mut self,
        chat_id: &str,
        override_courses: Option<Vec<Course>>,
    ) -> Result<bool> {
        if self.repository.get_chat(chat_id).await?.is_none() {
            tracing::warn!(%chat_id, "Cannot open unknown chat");
            return Ok(false);
        }

        self.dispatch(SessionEvent::OpenChat {
            chat_id: chat_id.to_string(),
            override_courses,
        })
        .await?;
        Ok(true)
    }

    /// Handles a click on a history entry.
    ///
    /// # Errors
    ///
    /// `NoCourseSelected` when nothing is selected. The chat is not even
    /// looked up in that case; the caller should show discovery.
    pub async fn request_open_chat(&mut self, chat_id: &str) -> Result<OpenChatOutcome> {
        if self.state.selected_courses().is_empty() {
            return Err(CompanionError::NoCourseSelected);
        }

        let Some(chat) = self.repository.get_chat(chat_id).await? else {
            tracing::warn!(%chat_id, "Requested chat not found");
            return Ok(OpenChatOutcome::NotFound);
        };

        let effects = self.dispatch(SessionEvent::RequestOpenChat { chat }).await?;
        for effect in effects {
            match effect {
                SessionEffect::ChatOpened { chat_id } => {
                    return Ok(OpenChatOutcome::Opened { chat_id });
                }
                SessionEffect::PromptUser { pending } => {
                    return Ok(OpenChatOutcome::AwaitingChoice(pending));
                }
                _ => {}
            }
        }
        Err(CompanionError::internal(
            "chat request produced neither an open nor a prompt",
        ))
    }

    /// Answers the pending prompt with "continue with original courses".
    /// Returns the id of the opened chat.
    pub async fn continue_with_original(&mut self) -> Result<String> {
        let effects = self
            .dispatch(SessionEvent::ResolveChoice {
                choice: ChatChoice::ContinueOriginal,
            })
            .await?;
        effects
            .into_iter()
            .find_map(|effect| match effect {
                SessionEffect::ChatOpened { chat_id } => Some(chat_id),
                _ => None,
            })
            .ok_or_else(|| CompanionError::internal("continuing a chat did not open it"))
    }

    /// Answers the pending prompt with "start a new chat" over the current
    /// selection.
    pub async fn start_new_instead(&mut self, title: &str) -> Result<ChatRecord> {
        let effects = self
            .dispatch(SessionEvent::ResolveChoice {
                choice: ChatChoice::StartNew {
                    chat_id: new_chat_id(),
                    title: title.to_string(),
                    at: Utc::now(),
                },
            })
            .await?;
        created_chat(effects)
    }

    /// Dismisses the pending prompt.
    pub fn cancel_choice(&mut self) -> Result<()> {
        self.apply_local(SessionEvent::ResolveChoice {
            choice: ChatChoice::Cancel,
        })
        .map(drop)
    }

    /// Lists history for the current selection, most recent first.
    ///
    /// `filter` defaults to the configured history filter.
    pub async fn history(&self, filter: Option<HistoryFilter>) -> Result<Vec<ChatRecord>> {
        let chats = self.repository.list_chats().await?;
        Ok(filter_history(
            chats,
            self.state.selected_courses(),
            filter.unwrap_or(self.history_filter),
        ))
    }

    /// Records a message on a chat and persists it.
    ///
    /// Returns `None` when the chat does not exist.
    pub async fn record_message(
        &self,
        chat_id: &str,
        preview: &str,
    ) -> Result<Option<ChatRecord>> {
        let Some(mut chat) = self.repository.get_chat(chat_id).await? else {
            tracing::warn!(%chat_id, "Cannot record message on unknown chat");
            return Ok(None);
        };

        chat.record_message(preview, Utc::now());
        self.repository.save_chat(&chat).await?;
        Ok(Some(chat))
    }
}

fn new_chat_id() -> String {
    Uuid::new_v4().to_string()
}

fn created_chat(effects: Vec<SessionEffect>) -> Result<ChatRecord> {
    effects
        .into_iter()
        .find_map(|effect| match effect {
            SessionEffect::ChatCreated { chat } => Some(chat),
            _ => None,
        })
        .ok_or_else(|| CompanionError::internal("chat creation produced no chat"))
}
