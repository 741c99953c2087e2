use console::style;
use termimad::MadSkin;

/// Greeting shown when the console session starts
pub fn display_banner(provider: &str, model: &str) {
    println!(
        "{} {}",
        style("Chatting with Lenny").bold().magenta(),
        style(format!("({} · {})", provider, model)).dim()
    );
    println!(
        "{}",
        style("Type 'exit' or 'quit' (or press Ctrl+D) to leave.").dim()
    );
}

/// Print one of Lenny's replies, rendering markdown such as **bold**.
pub fn display_reply(reply: &str) {
    let skin = MadSkin::default();
    print!("{} ", style("Lenny:").bold().green());
    if reply.contains('*') || reply.contains('`') || reply.contains('#') {
        println!();
        skin.print_text(reply);
    } else {
        println!("{}", reply);
    }
}

pub fn display_goodbye() {
    println!("{}", style("Exiting chat. Goodbye!").bold().cyan());
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("error:").bold().red(), message);
}
