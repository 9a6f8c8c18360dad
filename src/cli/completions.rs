//! Shell completions generation.

use clap::Args;
use clap_complete::Shell;

/// Generate shell completions
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> crate::error::Result<()> {
    let mut cmd = <super::Cli as clap::CommandFactory>::command();
    write(args.shell, &mut cmd, &mut std::io::stdout());
    Ok(())
}

fn write(shell: Shell, cmd: &mut clap::Command, out: &mut dyn std::io::Write) {
    clap_complete::generate(shell, cmd, "postgen", out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_bash_completions_mention_subcommands() {
        let mut cmd = crate::cli::Cli::command();
        let mut out = Vec::new();
        write(Shell::Bash, &mut cmd, &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("postgen"));
        assert!(script.contains("create-defaults"));
    }
}
