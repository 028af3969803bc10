// Interview feedback prompts. `generate_feedback` is the only caller.

pub const FEEDBACK_SYSTEM_PROMPT: &str = "\
You are an expert interviewer and career coach. \
Analyze the candidate's resume and skills to provide detailed, constructive feedback. \
Focus on their strengths and areas for improvement based on their experience and skill assessments.";

pub const FEEDBACK_USER_TEMPLATE: &str = "\
Resume: {resume}
Skills: {skills}
Please provide interview feedback and tips.";
