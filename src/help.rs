//! Static usage text for the `help` builtin.

pub struct CommandHelp {
    pub name: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
    pub details: &'static [&'static str],
}

pub const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "cd",
        summary: "Change the shell working directory",
        usage: "cd [DIRECTORY]",
        details: &[
            "Without DIRECTORY, or with `~` or `--`, change to $HOME.",
            "`cd -` returns to $OLDPWD and prints the new directory.",
            "PWD and OLDPWD are updated on success.",
        ],
    },
    CommandHelp {
        name: "env",
        summary: "Print the environment",
        usage: "env",
        details: &["Each variable is printed as NAME=VALUE on its own line."],
    },
    CommandHelp {
        name: "setenv",
        summary: "Set an environment variable",
        usage: "setenv VARIABLE VALUE",
        details: &["Creates VARIABLE or overwrites its current value."],
    },
    CommandHelp {
        name: "unsetenv",
        summary: "Remove an environment variable",
        usage: "unsetenv VARIABLE",
        details: &[],
    },
    CommandHelp {
        name: "exit",
        summary: "Exit the shell",
        usage: "exit [N]",
        details: &[
            "Exits with status N modulo 256.",
            "Without N the status of the last command is used.",
        ],
    },
    CommandHelp {
        name: "help",
        summary: "Display information about builtin commands",
        usage: "help [COMMAND]",
        details: &[],
    },
];

pub fn get_help(name: &str) -> Option<&'static CommandHelp> {
    COMMANDS.iter().find(|c| c.name == name)
}

pub fn format_help(cmd: &CommandHelp) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} - {}\n\n", cmd.name, cmd.summary));
    out.push_str(&format!("Usage: {}\n", cmd.usage));
    if !cmd.details.is_empty() {
        out.push('\n');
        for line in cmd.details {
            out.push_str(&format!("  {line}\n"));
        }
    }
    out
}

pub fn format_help_list() -> String {
    let mut out = String::new();
    out.push_str("chainsh - a line-oriented command interpreter\n\n");
    out.push_str("Commands are separated by `;`, `&&` (run if the previous succeeded)\n");
    out.push_str("and `||` (run if the previous failed).\n\n");
    out.push_str("Builtin commands:\n\n");

    for cmd in COMMANDS {
        out.push_str(&format!("  {:10} {}\n", cmd.name, cmd.summary));
    }

    out.push_str("\nUse 'help COMMAND' for more information.\n");
    out
}
