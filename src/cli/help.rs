use std::fmt::Write;

#[derive(Debug, Clone)]
struct OptionGuide {
    flag: &'static str,
    description: &'static str,
}

#[derive(Debug, Clone)]
struct CommandGuide {
    names: &'static [&'static str],
    summary: &'static str,
    usage: &'static [&'static str],
    options: &'static [OptionGuide],
    examples: &'static [&'static str],
}

const GLOBAL_OPTIONS: &[OptionGuide] = &[
    OptionGuide {
        flag: "-h, --help",
        description: "Show contextual help information.",
    },
    OptionGuide {
        flag: "--version",
        description: "Print the resolver version.",
    },
];

const CHECK_OPTIONS: &[OptionGuide] = &[
    OptionGuide {
        flag: "--error-format <fmt>",
        description: "Diagnostic format: human, short or json (default: human on a terminal).",
    },
    OptionGuide {
        flag: "--emit-lowered",
        description: "Print each null-conditional chain with its type and single-evaluation form.",
    },
    OptionGuide {
        flag: "--sequential",
        description: "Resolve declarations on one thread.",
    },
    OptionGuide {
        flag: "--trace-pipeline",
        description: "Log a `pipeline` event for every stage.",
    },
    OptionGuide {
        flag: "--log-format <fmt>",
        description: "Log output format: auto, text or json (env: CHIC_LOG_FORMAT).",
    },
    OptionGuide {
        flag: "--log-level <level>",
        description: "Log verbosity: error, warn, info, debug or trace (env: CHIC_LOG_LEVEL).",
    },
];

const COMMAND_GUIDES: &[CommandGuide] = &[
    CommandGuide {
        names: &["check", "resolve"],
        summary: "Resolve primary constructor captures and type-check null-conditional chains.",
        usage: &["chic-resolve check <file> [options]"],
        options: CHECK_OPTIONS,
        examples: &[
            "chic-resolve check src/Person.cl",
            "chic-resolve check src/Person.cl --emit-lowered --error-format json",
        ],
    },
    CommandGuide {
        names: &["help"],
        summary: "Show help for a command.",
        usage: &["chic-resolve help [command]"],
        options: &[],
        examples: &["chic-resolve help check"],
    },
    CommandGuide {
        names: &["version"],
        summary: "Print the resolver version.",
        usage: &["chic-resolve version", "chic-resolve --version"],
        options: &[],
        examples: &[],
    },
];

pub(crate) fn render_general_help() -> String {
    let mut out = String::new();
    out.push_str(
        "chic-resolve – primary constructor capture and null-conditional resolution\n\n",
    );
    out.push_str("USAGE:\n  chic-resolve <command> [options]\n\n");
    out.push_str("COMMANDS:\n");
    for guide in COMMAND_GUIDES {
        let _ = writeln!(out, "  {:11} {}", guide.names[0], guide.summary);
    }
    out.push('\n');
    out.push_str("GLOBAL OPTIONS:\n");
    for option in GLOBAL_OPTIONS {
        let _ = writeln!(out, "  {:18} {}", option.flag, option.description);
    }
    out.push('\n');
    out.push_str("Use `chic-resolve help <command>` to view detailed usage and examples.");
    out.push('\n');
    out
}

pub(crate) fn render_command_help(topic: &str) -> Option<String> {
    let guide = find_guide(topic)?;
    let mut out = String::new();
    let _ = writeln!(out, "chic-resolve {} – {}", guide.names[0], guide.summary);
    out.push('\n');

    out.push_str("USAGE:\n");
    for usage in guide.usage {
        let _ = writeln!(out, "  {usage}");
    }

    if guide.names.len() > 1 {
        out.push('\n');
        out.push_str("ALIASES:\n");
        for alias in &guide.names[1..] {
            let _ = writeln!(out, "  {alias}");
        }
    }

    if !guide.options.is_empty() {
        out.push('\n');
        out.push_str("OPTIONS:\n");
        for option in guide.options {
            let _ = writeln!(out, "  {:24} {}", option.flag, option.description);
        }
    }

    if !guide.examples.is_empty() {
        out.push('\n');
        out.push_str("EXAMPLES:\n");
        for example in guide.examples {
            let _ = writeln!(out, "  {example}");
        }
    }
    Some(out)
}

pub(crate) fn format_unknown_topic(topic: &str) -> String {
    let mut known: Vec<&str> = COMMAND_GUIDES.iter().map(|guide| guide.names[0]).collect();
    known.sort_unstable();
    format!(
        "unknown help topic '{topic}'; available commands: {}",
        known.join(", ")
    )
}

fn find_guide(topic: &str) -> Option<&'static CommandGuide> {
    COMMAND_GUIDES.iter().find(|guide| {
        guide
            .names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(topic))
    })
}
