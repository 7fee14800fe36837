//! Prompt composition for code completion
//!
//! Builds the single user message sent to the model. The message carries the
//! code on both sides of the cursor plus the output rules the reply has to
//! follow, so the formatter downstream has as little to clean up as possible.

use crate::language::LanguageSpec;

/// Compose the completion prompt for the code surrounding the cursor
pub fn build_prompt(file_name: &str, lang: &LanguageSpec, prefix: &str, suffix: &str) -> String {
    format!(
        "Continue this {name} code:\n\
         \n\
         ### FILE TYPE AND CONTENT:\n\
         File name: {file_name}\n\
         \n\
         ### ROLE:\n\
         You are an expert-level {id} developer.\n\
         \n\
         ### CONTEXT:\n\
         The user is editing a code file in {id}.\n\
         \n\
         1. Code that appears **before** the cursor (do NOT repeat):\n\
         ```\n\
         {prefix}\n\
         ```\n\
         \n\
         2. Code that appears **after** the cursor (do NOT repeat):\n\
         ```\n\
         {suffix}\n\
         ```\n\
         \n\
         ### INSTRUCTIONS:\n\
         - Infer the framework and environment from the imports, syntax, and conventions in the code.\n\
         - Write ONLY the missing code that belongs exactly between the two parts above.\n\
         - It must logically connect the preceding and following code so the result is correct and functional.\n\
         - Follow the same indentation, formatting, and naming conventions as the given context.\n\
         - Assume all variables, imports, functions, and classes declared above are available.\n\
         - If there is nothing to add, return an empty output.\n\
         \n\
         ### OUTPUT RULES:\n\
         1. Only output valid {id} code as it should appear in the file. No markdown, no explanations.\n\
         2. Do NOT output any lines starting with ``` (triple backticks).\n\
         3. Output only the minimal required code, directly for insertion at the cursor.\n\
         4. No extra formatting, comments, or non-code artifacts.\n\
         \n\
         Now, generate the missing code:\n",
        name = lang.name,
        id = lang.id,
        file_name = file_name,
        prefix = prefix,
        suffix = suffix,
    )
}
