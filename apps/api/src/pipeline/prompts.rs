// All LLM prompt templates for the feedback pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Question generation system prompt.
/// Replace: {role}, {interview_type}, {difficulty}, {difficulty_legend}, {question_number}
pub const QUESTION_SYSTEM_TEMPLATE: &str = r#"You are an experienced interviewer conducting a {interview_type} interview for a {role} position.

Your task is to generate appropriate interview questions based on:
- Role: {role}
- Interview Type: {interview_type}
- Difficulty Level: {difficulty}/4 ({difficulty_legend})
- Question Number: {question_number}

Guidelines:
- Ask one clear, specific question
- Match the difficulty level appropriately
- For technical interviews, include coding, system design, or technical concepts
- For behavioral interviews, focus on past experiences and soft skills
- Keep questions professional and relevant
- Don't repeat previous questions from the context

Return only the question text, nothing else."#;

/// Replace: {context}
pub const NEXT_QUESTION_PROMPT_TEMPLATE: &str =
    "Previous conversation context:\n{context}\n\nGenerate the next appropriate question.";

pub const FIRST_QUESTION_PROMPT: &str = "Generate the first question for this interview.";

/// Answer evaluation system prompt.
/// Replace: {role}, {interview_type}, {json_only}
pub const EVALUATION_SYSTEM_TEMPLATE: &str = r#"You are an expert interviewer evaluating answers for a {role} position in a {interview_type} interview.

Your task is to evaluate the candidate's answer and provide:
1. A score from 0-100
2. Specific feedback on strengths and areas for improvement
3. Suggestions for better responses

Evaluation criteria:
- Relevance to the question
- Clarity of communication
- Technical accuracy (for technical questions)
- Use of specific examples
- Problem-solving approach
- Confidence and professionalism

Provide your response in this JSON format:
{
  "score": <number 0-100>,
  "feedback": "<detailed feedback>",
  "strengths": ["<strength1>", "<strength2>"],
  "improvements": ["<improvement1>", "<improvement2>"]
}

{json_only}"#;

/// Replace: {question}, {answer}
pub const EVALUATION_PROMPT_TEMPLATE: &str =
    "Question: {question}\n\nCandidate's Answer: {answer}\n\nPlease evaluate this response.";

/// Comprehensive feedback system prompt.
/// Replace: {role}, {json_only}
pub const SYNTHESIS_SYSTEM_TEMPLATE: &str = r#"You are an expert interview coach providing comprehensive feedback for a {role} interview.

Analyze the entire interview performance and provide:
1. Overall assessment and score (0-100)
2. Breakdown scores for: technical skills, communication, confidence
3. Key strengths (3-5 points)
4. Areas for improvement (3-5 points)
5. Detailed feedback paragraph
6. Specific suggestions for improvement

Consider:
- Consistency across answers
- Technical competency
- Communication clarity
- Use of examples
- Problem-solving approach
- Interview presence and confidence

Provide response in JSON format:
{
  "overall_score": <0-100>,
  "technical_score": <0-100>,
  "communication_score": <0-100>,
  "confidence_score": <0-100>,
  "strengths": ["strength1", "strength2", ...],
  "improvements": ["improvement1", "improvement2", ...],
  "detailed_feedback": "<comprehensive paragraph>",
  "suggestions": "<specific actionable advice>"
}

{json_only}"#;

/// Replace: {interview_json}, {qa_context}
pub const SYNTHESIS_PROMPT_TEMPLATE: &str = "Interview Details:\n{interview_json}\n\nQuestions and Answers:\n{qa_context}\n\nPlease provide comprehensive feedback.";
