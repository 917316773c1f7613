//! REPL input parsing tests.

use maisys_cli::repl::Input;

#[test]
fn plain_text_is_a_message() {
    assert_eq!(
        Input::parse("  Bonjour MAISYS  "),
        Input::Message("Bonjour MAISYS".into())
    );
    assert_eq!(Input::parse("   "), Input::Empty);
}

#[test]
fn commands() {
    assert_eq!(Input::parse("/new"), Input::New);
    assert_eq!(Input::parse("/list"), Input::List);
    assert_eq!(Input::parse("/select 01J0ABC"), Input::Select("01J0ABC".into()));
    assert_eq!(Input::parse("/delete  01J0ABC "), Input::Delete("01J0ABC".into()));
    assert_eq!(Input::parse("/actions"), Input::Actions);
    assert_eq!(Input::parse("/action 2"), Input::Action(2));
    assert_eq!(Input::parse("/help"), Input::Help);
    assert_eq!(Input::parse("/quit"), Input::Quit);
    assert_eq!(Input::parse("/exit"), Input::Quit);
}

#[test]
fn malformed_commands_are_unknown() {
    assert_eq!(Input::parse("/select"), Input::Unknown("/select".into()));
    assert_eq!(Input::parse("/action 0"), Input::Unknown("/action 0".into()));
    assert_eq!(Input::parse("/action deux"), Input::Unknown("/action deux".into()));
    assert_eq!(Input::parse("/virement"), Input::Unknown("/virement".into()));
}
