//! Structured inquiries routed to the inquiry handler agent.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::agent::{result_status, AgentClient, AgentInvocationResult, ResponseExtractor};
use crate::error::unified::NETWORK_ERROR_TEXT;
use crate::types::Status;

pub const SEND_FAILED_TEXT: &str = "Failed to send. Please try again.";
pub const SENT_TEXT: &str = "Your inquiry has been sent successfully!";

/// Status substrings that mark an otherwise successful reply as a failure.
///
/// This matches on the agent's free-form status vocabulary and will break if
/// that vocabulary changes.
const FAILURE_STATUS_MARKERS: [&str; 2] = ["fail", "error"];

/// Suggested values for [`InquiryForm::interest_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum InterestType {
    Course,
    Agent,
    Consultation,
    Other,
}

impl InterestType {
    pub const ALL: [InterestType; 4] = [Self::Course, Self::Agent, Self::Consultation, Self::Other];
}

/// Visitor-entered inquiry. All fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryForm {
    pub name: String,
    pub email: String,
    pub interest_type: String,
    pub message: String,
}

impl InquiryForm {
    /// Names of fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("interest_type", &self.interest_type),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The team member an inquiry is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamContact {
    pub name: String,
    pub email: String,
}

impl TeamContact {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Build the instruction sent to the inquiry agent.
pub fn compose_instruction(form: &InquiryForm, member: &TeamContact) -> String {
    format!(
        "Please send an inquiry email with the following details:\n\
         - Visitor Name: {}\n\
         - Visitor Email: {}\n\
         - Interest Type: {}\n\
         - Message: {}\n\
         - Team Member: {}\n\
         - Send to: {}",
        form.name, form.email, form.interest_type, form.message, member.name, member.email
    )
}

/// What [`InquiryWorkflow::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A required field was empty; nothing was sent.
    Incomplete,
    /// The agent was invoked; see [`InquiryWorkflow::status`].
    Sent,
}

/// Drives one inquiry modal session for one team member.
///
/// `submit` borrows the workflow mutably for the whole round trip, so a
/// second submission cannot start while one is pending.
pub struct InquiryWorkflow {
    client: Arc<dyn AgentClient>,
    agent_id: String,
    member: TeamContact,
    extractor: ResponseExtractor,
    form: InquiryForm,
    status: Status,
}

impl std::fmt::Debug for InquiryWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InquiryWorkflow")
            .field("agent_id", &self.agent_id)
            .field("member", &self.member)
            .field("form", &self.form)
            .field("status", &self.status)
            .finish()
    }
}

impl InquiryWorkflow {
    pub fn new(
        client: Arc<dyn AgentClient>,
        agent_id: impl Into<String>,
        member: TeamContact,
    ) -> Self {
        Self {
            client,
            agent_id: agent_id.into(),
            member,
            extractor: ResponseExtractor::inquiry(),
            form: InquiryForm::default(),
            status: Status::none(),
        }
    }

    pub fn form(&self) -> &InquiryForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut InquiryForm {
        &mut self.form
    }

    pub fn set_form(&mut self, form: InquiryForm) {
        self.form = form;
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn member(&self) -> &TeamContact {
        &self.member
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Dismiss the status banner.
    pub fn dismiss_status(&mut self) {
        self.status.clear();
    }

    /// Close the modal: reset the form and the banner.
    pub fn cancel(&mut self) {
        self.form.reset();
        self.status.clear();
    }

    /// Validate, send, and interpret the agent's reply.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.form.is_complete() {
            tracing::debug!(missing = ?self.form.missing_fields(), "inquiry not sent");
            return SubmitOutcome::Incomplete;
        }

        self.status.clear();
        let instruction = compose_instruction(&self.form, &self.member);

        let result = self.client.invoke(&instruction, &self.agent_id).await;

        self.apply(&result);
        SubmitOutcome::Sent
    }

    fn apply(&mut self, result: &AgentInvocationResult) {
        if result.is_transport_failure() {
            self.status = Status::error(NETWORK_ERROR_TEXT);
            return;
        }
        if !result.success {
            self.status = Status::error(result.error_message().unwrap_or(SEND_FAILED_TEXT));
            return;
        }

        let reply = result.raw_response.as_ref();
        let message = self.extractor.extract_optional(reply);
        if status_signals_failure(result_status(reply)) {
            tracing::warn!(member = %self.member.name, "inquiry agent reported failure");
            self.status = Status::error(message.unwrap_or_else(|| SEND_FAILED_TEXT.to_string()));
        } else {
            tracing::info!(member = %self.member.name, "inquiry sent");
            self.status = Status::success(message.unwrap_or_else(|| SENT_TEXT.to_string()));
            self.form.reset();
        }
    }
}

/// Case-insensitive substring match on the agent's status string.
pub fn status_signals_failure(status: Option<&str>) -> bool {
    let Some(status) = status else {
        return false;
    };
    let lowered = status.to_lowercase();
    FAILURE_STATUS_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> InquiryForm {
        InquiryForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            interest_type: InterestType::Consultation.to_string(),
            message: "Let's talk".into(),
        }
    }

    #[test]
    fn missing_fields_lists_each_empty_field() {
        let mut form = filled();
        form.email.clear();
        form.message.clear();
        assert_eq!(form.missing_fields(), vec!["email", "message"]);
        assert!(!form.is_complete());
        assert!(filled().is_complete());
    }

    #[test]
    fn instruction_embeds_visitor_and_member() {
        let text = compose_instruction(&filled(), &TeamContact::new("Karthik Nair", "karthik@lyzr.ai"));
        assert_eq!(
            text,
            "Please send an inquiry email with the following details:\n\
             - Visitor Name: Ada\n\
             - Visitor Email: ada@example.com\n\
             - Interest Type: Consultation\n\
             - Message: Let's talk\n\
             - Team Member: Karthik Nair\n\
             - Send to: karthik@lyzr.ai"
        );
    }

    #[test]
    fn failure_markers_are_case_insensitive_substrings() {
        assert!(status_signals_failure(Some("FAILED")));
        assert!(status_signals_failure(Some("smtp_error")));
        assert!(!status_signals_failure(Some("sent")));
        assert!(!status_signals_failure(None));
    }

    #[test]
    fn interest_types_parse_from_display_names() {
        assert_eq!("Course".parse::<InterestType>().unwrap(), InterestType::Course);
        assert_eq!(InterestType::Other.to_string(), "Other");
        assert_eq!(InterestType::ALL.len(), 4);
    }
}
