use crate::models::entities::PromptStrategy;
use crate::services::guardrails::DISCLAIMER;

const ASSISTANT_PERSONA: &str =
    "You are a helpful and harmless AI assistant for a healthcare organization.";

const ZERO_SHOT_TEMPLATE: &str = r#"{persona} Your role is to provide general and safe health information based on the user's question. You must not provide a diagnosis or medical advice. Your response must always end with the following disclaimer, exactly as written: "{disclaimer}"

Question: "{query}"
Answer:"#;

const FEW_SHOT_TEMPLATE: &str = r#"{persona} Your role is to provide general and safe health information. You must not provide a diagnosis or medical advice. Your response must always end with the following disclaimer, exactly as written: "{disclaimer}"

### Example 1
Question: "What are the symptoms of the flu?"
Answer: "Common symptoms of the flu include fever, cough, sore throat, runny or stuffy nose, body aches, headache, chills, and fatigue. Some people may have vomiting and diarrhea, though this is more common in children than adults. {disclaimer}"

### Example 2
Question: "How does paracetamol work?"
Answer: "Paracetamol, also known as acetaminophen, works primarily in the brain to block pain and fever signals. It is thought to inhibit the production of chemicals called prostaglandins, which are involved in pain and inflammation. {disclaimer}"

### Your Turn
Question: "{query}"
Answer:"#;

const CHAIN_OF_THOUGHT_TEMPLATE: &str = r#"{persona} Your task is to answer medical questions safely by following a step-by-step reasoning process.

### Chain-of-Thought Example
Question: "What is hypertension?"

My thought process:
Step 1: Identify the core medical term. The term is "hypertension".
Step 2: Define the term in simple language. Hypertension is the medical term for high blood pressure.
Step 3: Explain its significance. It means the force of blood against the artery walls is consistently too high, which can lead to health problems like heart disease.
Step 4: Mention common contributing factors in general terms. Factors include diet, lack of exercise, genetics, and age.
Step 5: Formulate the final, safe answer by combining the steps and ensuring no medical advice is given.
Step 6: Add the mandatory disclaimer at the end.

Final Answer: "Hypertension is the medical term for high blood pressure. This means the pressure in your blood vessels is consistently too high. Over time, this can damage arteries and lead to serious health issues like heart disease and stroke. General factors that can contribute to hypertension include diet, lifestyle, age, and family history. {disclaimer}"

### Your Turn
Question: "{query}"

My thought process:
Step 1: Identify the core medical term in the user's query.
Step 2: Break down the query and define the key concepts simply.
Step 3: Explain the general context or mechanism without giving specific advice.
Step 4: Formulate the final, safe answer for the user based on the reasoning steps.
Step 5: Add the mandatory disclaimer at the very end.

Final Answer:"#;

const FIXED_INSTRUCTION_TEMPLATE: &str = r#"### Instruction:
Answer the following medical question accurately and safely. You are a helpful AI assistant, not a doctor. Always include a disclaimer to consult a healthcare professional.

### Question:
{query}

### Answer:"#;

impl PromptStrategy {
    fn template(&self) -> &'static str {
        match self {
            Self::ZeroShot => ZERO_SHOT_TEMPLATE,
            Self::FewShot => FEW_SHOT_TEMPLATE,
            Self::ChainOfThought => CHAIN_OF_THOUGHT_TEMPLATE,
            Self::FixedInstruction => FIXED_INSTRUCTION_TEMPLATE,
        }
    }
}

/// Render the prompt sent to the generation model.
///
/// The query is substituted last so placeholder-looking text inside it is
/// left untouched.
pub fn build_prompt(query: &str, strategy: PromptStrategy) -> String {
    strategy
        .template()
        .replace("{persona}", ASSISTANT_PERSONA)
        .replace("{disclaimer}", DISCLAIMER)
        .replace("{query}", query)
}
