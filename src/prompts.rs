//! Instruction templates sent to the text-completion service.

/// Marker that opens the header line of every generated commit message.
pub const HEADER_MARKER: &str = "#comment";

const MESSAGE_FORMAT: &str = "\
Use this commit message format:
\"
#comment <one line describing what the change does>
- <first change>
- <second change>
\"
The first line always starts with the fixed token \"#comment\" followed by the summary on the same line.
Return exactly one \"#comment\" line no matter how many files or commits are involved, then one bullet per notable change.
Keep the first line short and clear.
";

pub const COMMIT_INTRO: &str = "\
Act as a senior software engineer fluent in Node.js, Python, Java and Go.
Write a commit message for the diff below.
Only lines starting with \"+\" or \"-\" are changes; ignore the rest.
Do not describe the diff line by line. Summarize whole methods where possible.
When a changed line is only a code comment, summarize it as adding comments, for example:
\"
#comment add comments for getInventoryItemsByProductId method.
\"
";

pub const SQUASH_INTRO: &str = "\
Act as a senior software engineer.
The commit messages below are about to be squashed into a single commit.
Merge them into one commit message that covers all of them, without repeating the same change twice.
";

pub const COMMENT_INTRO: &str = "\
Act as a full-stack software engineer proficient in Node.js, Python, Java, AWS and architecture design.
Read the code below and add clear, brief comments to it.
Place every comment on its own line directly above the code it describes and keep the existing formatting and indentation.
For a whole function or class, write a comment suited to the function or class.
For a single line, return the comment followed by that line, for example:
\"
// clear the doc for a specific user
this.clearDocForUser(userId);
\"
Only add comments. Do not change the code itself, and return the whole snippet.
";

pub const POLISH_INTRO: &str = "\
Act as a full-stack software engineer and polish the comment below. Reply with the comment only.
Keep its meaning, make it read fluently, fix grammar and spelling, and make it sound like a native speaker wrote it.
Keep the original layout as far as possible; if it starts with '#', the result still starts with '#'.
";

/// Prompt for a commit message describing the working-tree `diff`.
pub fn commit_prompt(diff: &str) -> String {
    format!(
        "{}{}Now generate one commit message for the following change:\n\n{}",
        COMMIT_INTRO,
        MESSAGE_FORMAT,
        diff.trim()
    )
}

/// Prompt that asks for one commit message covering every message in `messages`.
pub fn squash_prompt(messages: &[String]) -> String {
    format!(
        "{}{}Commit messages:\n\n{}",
        SQUASH_INTRO,
        MESSAGE_FORMAT,
        messages.join("\n")
    )
}

pub fn comment_prompt(code: &str) -> String {
    format!("{}\n{}", COMMENT_INTRO, code)
}

pub fn polish_prompt(comment: &str) -> String {
    format!("{}\n{}", POLISH_INTRO, comment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squash_prompt_lists_messages_one_per_line() {
        let prompt = squash_prompt(&["fix a".to_string(), "add b".to_string()]);
        assert!(prompt.ends_with("fix a\nadd b"));
        assert!(prompt.contains(HEADER_MARKER));
    }

    #[test]
    fn test_commit_prompt_trims_diff() {
        let prompt = commit_prompt("\n+ let x = 1;\n\n");
        assert!(prompt.ends_with("+ let x = 1;"));
    }
}
