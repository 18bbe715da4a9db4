use super::*;

fn names(commands: &[Command]) -> Vec<&str> {
    commands.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn test_single_command_with_argument() {
    let commands = parse("/test ci.yml");

    assert_eq!(commands, vec![Command::new("test", "ci.yml", 0)]);
}

#[test]
fn test_multiple_commands_in_document_order() {
    let commands = parse("/test\n/merge squash\n/report");

    assert_eq!(names(&commands), vec!["test", "merge", "report"]);
    assert_eq!(commands[0].args, "");
    assert_eq!(commands[1].args, "squash");
    assert_eq!(commands[2].args, "");
}

#[test]
fn test_no_commands() {
    assert!(parse("Looks good to me!").is_empty());
    assert!(parse("").is_empty());
    assert!(parse("/").is_empty());
    assert!(parse("/ test").is_empty());
}

#[test]
fn test_name_is_lower_cased_and_args_trimmed() {
    let commands = parse("/MERGE   Rebase   ");

    assert_eq!(commands[0].name, "merge");
    assert_eq!(commands[0].args, "Rebase");
}

#[test]
fn test_arguments_do_not_cross_lines() {
    let commands = parse("/test\nci.yml");

    assert_eq!(commands, vec![Command::new("test", "", 0)]);
}

#[test]
fn test_command_after_text_on_same_line() {
    let commands = parse("please run /test ci.yml");

    assert_eq!(commands, vec![Command::new("test", "ci.yml", 11)]);
}

#[test]
fn test_slash_need_not_follow_whitespace() {
    assert_eq!(parse("CC/test ci.yml"), vec![Command::new("test", "ci.yml", 2)]);
    assert_eq!(parse("(/report)"), vec![Command::new("report", "", 1)]);
    assert_eq!(parse("//comment"), vec![Command::new("comment", "", 1)]);
}

#[test]
fn test_each_path_segment_without_argument_is_a_command() {
    let commands = parse("src/main.rs");

    assert_eq!(commands, vec![Command::new("main", "", 3)]);
}

#[test]
fn test_positions_are_byte_offsets_across_lines() {
    let text = "LGTM\n\n  /report\n/test build";
    let commands = parse(text);

    assert_eq!(commands.len(), 2);
    for command in &commands {
        assert_eq!(&text[command.position..command.position + 1], "/");
    }
    assert_eq!(commands[0].position, 8);
    assert_eq!(commands[1].position, 16);
}

#[test]
fn test_duplicates_are_kept() {
    let commands = parse("/test\n/test\n/test deploy.yml");

    assert_eq!(names(&commands), vec!["test", "test", "test"]);
    assert_eq!(commands[2].args, "deploy.yml");
}

#[test]
fn test_windows_line_endings() {
    let commands = parse("/test ci.yml\r\n/report\r\n");

    assert_eq!(names(&commands), vec!["test", "report"]);
    assert_eq!(commands[0].args, "ci.yml");
    assert_eq!(commands[1].args, "");
}

/// Everything after the first command on a line is its argument.
#[test]
fn test_rest_of_line_is_argument() {
    let commands = parse("/test ci.yml /merge");

    assert_eq!(commands, vec![Command::new("test", "ci.yml /merge", 0)]);
}
