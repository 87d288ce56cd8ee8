#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use rowstore::{EMAIL_SIZE, TABLE_MAX_ROWS, USERNAME_SIZE};

    // Helper function to pipe the commands into a fresh REPL
    fn run_commands<T: AsRef<str>>(commands: &[T]) -> Command {
        let mut cmd = Command::cargo_bin("rowstore").expect("Failed to run command");
        cmd.env_remove("RUST_LOG");

        let input = commands
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        cmd.write_stdin(input);
        cmd
    }

    #[test]
    fn it_inserts_and_retrieves_a_row() {
        let mut cmd = run_commands(&["insert 1 user1 person1@example.com", "select", ".exit"]);

        let expected = [
            "db > Executed.",
            "db > 1, user1, person1@example.com",
            "Executed.",
            "db > ",
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_selects_rows_in_insertion_order() {
        let mut cmd = run_commands(&[
            "insert 1 alice alice@example.com",
            "insert 2 bob bob@example.com",
            "select",
            ".exit",
        ]);

        let expected = [
            "db > Executed.",
            "db > Executed.",
            "db > 1, alice, alice@example.com",
            "2, bob, bob@example.com",
            "Executed.",
            "db > ",
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_selects_nothing_from_an_empty_table() {
        let mut cmd = run_commands(&["select", ".exit"]);

        cmd.assert()
            .success()
            .stdout(["db > Executed.", "db > "].join("\n"));
    }

    #[test]
    fn it_prints_error_message_when_table_is_full() {
        let mut commands = Vec::new();
        for i in 0..TABLE_MAX_ROWS + 1 {
            commands.push(format!("insert {i} user{i} person{i}@example.com"));
        }
        commands.push(String::from(".exit"));

        let mut cmd = run_commands(&commands);

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("db > Error: Table Full."));
    }

    #[test]
    fn it_keeps_a_full_table_intact_after_a_rejected_insert() {
        let mut commands = Vec::new();
        let mut expected = Vec::new();
        for i in 0..TABLE_MAX_ROWS {
            commands.push(format!("insert {i} user{i} person{i}@example.com"));
            expected.push(format!("{i}, user{i}, person{i}@example.com"));
        }
        commands.push(String::from("insert 9999 late late@example.com"));
        commands.push(String::from("select"));
        commands.push(String::from(".exit"));

        let mut cmd = run_commands(&commands);

        let rows = format!("db > {}\nExecuted.\ndb > ", expected.join("\n"));
        cmd.assert()
            .success()
            .stdout(predicate::str::ends_with(rows))
            .stdout(predicate::str::contains("9999").not());
    }

    #[test]
    fn it_allows_inserting_strings_that_are_the_maximum_length() {
        let long_username = "a".repeat(USERNAME_SIZE);
        let long_email = "a".repeat(EMAIL_SIZE);

        let commands = [
            format!("insert 1 {} {}", &long_username, &long_email),
            String::from("select"),
            String::from(".exit"),
        ];

        let mut cmd = run_commands(&commands);

        let expected = [
            String::from("db > Executed."),
            format!("db > 1, {}, {}", long_username, long_email),
            String::from("Executed."),
            String::from("db > "),
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_prints_error_message_if_strings_are_too_long() {
        let long_username = "a".repeat(USERNAME_SIZE + 1);
        let long_email = "a".repeat(EMAIL_SIZE + 1);

        let commands = [
            format!("insert 1 {} {}", &long_username, &long_email),
            String::from("select"),
            String::from(".exit"),
        ];

        let mut cmd = run_commands(&commands);

        let expected = ["db > String is too long.", "db > Executed.", "db > "].join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_prints_error_message_if_id_is_negative() {
        let mut cmd = run_commands(&["insert -1 user1 person1@example.com", "select", ".exit"]);

        let expected = ["db > ID must be positive.", "db > Executed.", "db > "].join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_reports_syntax_errors() {
        let mut cmd = run_commands(&["insert x user1 person1@example.com", "insert 1", ".exit"]);

        let expected = [
            "db > Syntax error. Could not parse statement.",
            "db > Syntax error. Could not parse statement.",
            "db > ",
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_reports_unrecognized_input() {
        let mut cmd = run_commands(&["update 1", ".tables", ".exit"]);

        let expected = [
            "db > Unrecognized keyword at start of 'update 1'.",
            "db > Unrecognized command '.tables'",
            "db > ",
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_exits_cleanly_at_end_of_input() {
        let mut cmd = run_commands(&["insert 1 user1 person1@example.com"]);

        cmd.assert()
            .success()
            .stdout(["db > Executed.", "db > "].join("\n"));
    }

    #[test]
    fn it_keeps_rows_after_a_line_that_is_not_utf8() {
        let mut cmd = Command::cargo_bin("rowstore").expect("Failed to run command");
        cmd.env_remove("RUST_LOG");
        cmd.write_stdin(
            b"insert 1 alice alice@example.com\ninsert 2 b\xffb bob@example.com\nselect\n.exit\n"
                .to_vec(),
        );

        let expected = [
            "db > Executed.",
            "db > Input is not valid UTF-8.",
            "db > 1, alice, alice@example.com",
            "Executed.",
            "db > ",
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_uses_a_custom_prompt() {
        let mut cmd = run_commands(&["select", ".exit"]);
        cmd.args(["--prompt", "> "]);

        cmd.assert().success().stdout("> Executed.\n> ");
    }

    #[test]
    fn it_keeps_logs_off_stdout() {
        let mut cmd = run_commands(&["insert 1 user1 person1@example.com", ".exit"]);
        cmd.arg("-vvv");

        cmd.assert()
            .success()
            .stdout(["db > Executed.", "db > "].join("\n"))
            .stderr(predicate::str::contains("allocating page"));
    }
}
