//! Pure session reducer.
//!
//! `reduce` maps `(state, event)` to a new state plus effects. It never
//! mutates its input, so an `Err` leaves the caller's state exactly as it
//! was and a transition either applies completely or not at all.

use super::event::{ChatChoice, SessionEffect, SessionEvent, Transition};
use super::state::{ChatOpenFlow, SessionState};
use super::view::View;
use crate::chat::{ChatRecord, OpenDecision, PrimaryCoursePolicy, evaluate_open};
use crate::course::{Course, SelectedCourses};
use crate::error::{CompanionError, Result};
use chrono::{DateTime, Utc};

/// Reduces one event against `state`.
///
/// # Errors
///
/// - [`CompanionError::InvalidState`] when a chat is created with no course
///   selected, or a choice is resolved with no prompt pending.
/// - [`CompanionError::InvalidState`] when a chat would be opened over an
///   empty course list (an empty override or an empty original context).
/// - [`CompanionError::NoCourseSelected`] when a chat is requested, or the
///   chat panel opened, with no course selected. The caller should route to
///   discovery.
///
/// Missing courses or chats are not errors; they come back as
/// [`SessionEffect::Ignored`] with the state unchanged.
pub fn reduce(
    state: &SessionState,
    event: SessionEvent,
    policy: PrimaryCoursePolicy,
) -> Result<Transition> {
    let mut next = state.clone();

    let transition = match event {
        SessionEvent::OpenPanel { view } => {
            if view == View::Chat && state.selected_courses.is_empty() {
                return Err(CompanionError::NoCourseSelected);
            }
            open_panel(&mut next, view);
            Transition::new(next)
        }
        SessionEvent::ClosePanel => {
            next.current_view = None;
            next.active_icon = None;
            Transition::new(next)
        }
        SessionEvent::ToggleMenu => {
            next.is_menu_open = !next.is_menu_open;
            Transition::new(next)
        }
        SessionEvent::SelectCourse { course } => {
            select_course(&mut next, course);
            selection_changed(state, next)
        }
        SessionEvent::RemoveCourse { course_id } => {
            if next.selected_courses.remove(&course_id).is_none() {
                return Ok(ignored(state, "course", course_id));
            }
            if next.current_course_id.as_deref() == Some(course_id.as_str()) {
                next.current_course_id = first_course_id(&next.selected_courses);
            }
            selection_changed(state, next)
        }
        SessionEvent::ClearCourses => {
            clear_courses(&mut next);
            selection_changed(state, next)
        }
        SessionEvent::StartDiscovery => {
            clear_courses(&mut next);
            open_panel(&mut next, View::Discovery);
            selection_changed(state, next)
        }
        SessionEvent::FocusCourse { course_id } => {
            if !next.selected_courses.contains(&course_id) {
                return Ok(ignored(state, "course", course_id));
            }
            next.current_course_id = Some(course_id);
            Transition::new(next)
        }
        SessionEvent::CreateNewChat { chat_id, title, at } => {
            let chat = create_chat(&mut next, chat_id, title, at, policy)?;
            Transition::new(next).with_effect(SessionEffect::ChatCreated { chat })
        }
        SessionEvent::OpenChat {
            chat_id,
            override_courses,
        } => {
            if let Some(courses) = override_courses {
                if courses.is_empty() {
                    return Err(CompanionError::invalid_state(
                        "cannot open a chat over an empty course override",
                    ));
                }
                replace_selection(&mut next, courses, None);
            }
            activate_chat(next, chat_id)
        }
        SessionEvent::RequestOpenChat { chat } => {
            match evaluate_open(&chat, &state.selected_courses)? {
                OpenDecision::DirectOpen => activate_chat(next, chat.chat_id),
                OpenDecision::AwaitingUserChoice(pending) => {
                    next.chat_flow = ChatOpenFlow::AwaitingUserChoice(pending.clone());
                    Transition::new(next).with_effect(SessionEffect::PromptUser { pending })
                }
            }
        }
        SessionEvent::ResolveChoice { choice } => {
            let pending = state
                .pending_choice()
                .cloned()
                .ok_or_else(|| CompanionError::invalid_state("no chat choice is pending"))?;

            match choice {
                ChatChoice::ContinueOriginal => {
                    if pending.chat.course_context().is_empty() {
                        return Err(CompanionError::invalid_state(
                            "chat has no original courses to continue with",
                        ));
                    }
                    let primary = pending.chat.primary_course().map(|c| c.id.clone());
                    replace_selection(&mut next, pending.chat.context_courses(), primary);
                    activate_chat(next, pending.chat.chat_id)
                }
                ChatChoice::StartNew { chat_id, title, at } => {
                    let chat = create_chat(&mut next, chat_id, title, at, policy)?;
                    Transition::new(next).with_effect(SessionEffect::ChatCreated { chat })
                }
                ChatChoice::Cancel => {
                    next.chat_flow = ChatOpenFlow::Idle;
                    Transition::new(next).with_effect(SessionEffect::PromptDismissed {
                        chat_id: pending.chat.chat_id,
                    })
                }
            }
        }
    };

    Ok(transition)
}

fn ignored(state: &SessionState, entity_type: &'static str, id: String) -> Transition {
    Transition::new(state.clone()).with_effect(SessionEffect::Ignored {
        reason: CompanionError::not_found(entity_type, id),
    })
}

/// A pending prompt was evaluated against the old selection; once the
/// selection changes it is dismissed.
fn selection_changed(before: &SessionState, mut next: SessionState) -> Transition {
    if next.selected_courses == before.selected_courses {
        return Transition::new(next);
    }
    match std::mem::take(&mut next.chat_flow) {
        ChatOpenFlow::AwaitingUserChoice(pending) => {
            Transition::new(next).with_effect(SessionEffect::PromptDismissed {
                chat_id: pending.chat.chat_id,
            })
        }
        ChatOpenFlow::Idle => Transition::new(next),
    }
}

fn open_panel(state: &mut SessionState, view: View) {
    state.current_view = Some(view);
    state.is_menu_open = false;
    state.active_icon = view.icon();
}

fn select_course(state: &mut SessionState, course: Course) {
    let id = course.id.clone();
    if state.selected_courses.insert(course) && state.current_course_id.is_none() {
        state.current_course_id = Some(id);
    }
}

fn clear_courses(state: &mut SessionState) {
    state.selected_courses.clear();
    state.current_course_id = None;
}

fn first_course_id(selection: &SelectedCourses) -> Option<String> {
    selection.first().map(|c| c.id.clone())
}

/// Replaces the selection wholesale. `focus` wins when it is part of the new
/// selection; otherwise the first course is focused.
fn replace_selection(state: &mut SessionState, courses: Vec<Course>, focus: Option<String>) {
    state.selected_courses = SelectedCourses::from(courses);
    state.current_course_id = focus
        .filter(|id| state.selected_courses.contains(id))
        .or_else(|| first_course_id(&state.selected_courses));
}

/// Makes `chat_id` the active chat. Any pending prompt is resolved by this.
fn activate_chat(mut state: SessionState, chat_id: String) -> Transition {
    state.active_chat_id = Some(chat_id.clone());
    state.chat_flow = ChatOpenFlow::Idle;
    Transition::new(state).with_effect(SessionEffect::ChatOpened { chat_id })
}

fn create_chat(
    state: &mut SessionState,
    chat_id: String,
    title: String,
    at: DateTime<Utc>,
    policy: PrimaryCoursePolicy,
) -> Result<ChatRecord> {
    if state.selected_courses.is_empty() {
        return Err(CompanionError::invalid_state(
            "a chat needs at least one selected course",
        ));
    }

    let title = if title.trim().is_empty() {
        default_title(&state.selected_courses)
    } else {
        title
    };
    let context = policy.build_context(&state.selected_courses, state.current_course_id.as_deref());
    let chat = ChatRecord::new(chat_id.clone(), title, context, at);

    state.active_chat_id = Some(chat_id);
    state.chat_flow = ChatOpenFlow::Idle;
    Ok(chat)
}

fn default_title(selection: &SelectedCourses) -> String {
    selection
        .iter()
        .map(|c| c.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
