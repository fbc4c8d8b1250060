// Fixed strings and prompt templates for the conversation assistant.

/// Seeded as the first assistant message of every new session.
pub const WELCOME_MESSAGE: &str = "Hello! How can I help with this interview?";

/// Demo-mode reply for an ordinary chat turn when no API key is configured.
pub const DEMO_REPLY: &str = "[demo mode] No API key is configured for this session.\n\n\
    (With a key, a real answer would appear here.)";

/// Demo-mode reply for the question-drafting flow when no API key is
/// configured. Mirrors the two-group shape real replies are asked for.
pub const DEMO_DRAFT_REPLY: &str = "[demo mode] Example interview questions:\n\n\
    Technical Depth\n\
    1. Walk me through the most complex project on the resume. What part was yours?\n\
    2. Which requirement in the job description worries you most, and why?\n\n\
    Collaboration & Delivery\n\
    1. Tell me about a disagreement with a teammate and how it was resolved.\n\
    2. How do you decide something is ready to ship?";

/// Synthetic user turn recorded when question drafting is triggered, so the
/// chat log reads naturally.
pub const DRAFT_QUESTIONS_USER_TURN: &str =
    "Draft interview questions from the job description and the uploaded résumé.";

/// Hidden system prompt for question drafting.
/// Replace `{jd_text}` and `{resume_text}` before sending.
pub const DRAFT_QUESTIONS_SYSTEM_TEMPLATE: &str = "\
You are an experienced technical interviewer preparing for an interview.

JOB DESCRIPTION:
{jd_text}

CANDIDATE RESUME (extracted text, may be truncated):
{resume_text}

Draft interview questions in exactly two labeled groups:

Technical Depth
- 3 to 5 questions probing the core skills the job description asks for,
  anchored in concrete items from the resume where possible.

Collaboration & Delivery
- 3 to 5 questions about teamwork, communication, and how the candidate
  ships work.

Keep every question specific to this candidate and this role.";
