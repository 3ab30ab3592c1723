use super::html_to_lines;
use super::sanitize_html;
use super::PreviewPane;
use super::PreviewState;

#[test]
fn it_strips_script_blocks_with_their_content() {
    assert_eq!(
        sanitize_html(r#"<p>hi</p><script>alert("x")</script><p>bye</p>"#),
        "<p>hi</p><p>bye</p>"
    );
    assert_eq!(
        sanitize_html("<SCRIPT type=\"text/javascript\">\nbad()\n</script >done"),
        "done"
    );
}

#[test]
fn it_strips_iframes_event_handlers_and_javascript_uris() {
    let html = concat!(
        "<div onmouseover='hijack()'>",
        "<script>document.cookie</script>",
        "<p>Hello</p>",
        r#"<iframe src="https://evil.example"></iframe>"#,
        r#"<a href="javascript:void(0)">Click</a>"#,
        "</div>"
    );

    insta::assert_snapshot!(sanitize_html(html), @r###"<div><p>Hello</p><a href="void(0)">Click</a></div>"###);
}

#[test]
fn it_reduces_markup_to_text_lines() {
    let lines = html_to_lines(
        r#"<h1>Hello {{userName}}</h1><p>Welcome to <a href="https://x">X</a></p>"#,
    );

    assert_eq!(lines, vec!["Hello {{userName}}", "Welcome to X"]);
}

#[test]
fn it_decodes_entities_and_collapses_blank_lines() {
    assert_eq!(
        html_to_lines("<p>Fish &amp; Chips &lt;fresh&gt;</p>"),
        vec!["Fish & Chips <fresh>"]
    );
    assert_eq!(
        html_to_lines("<p>a</p><br><br><br><p>b</p>"),
        vec!["a", "", "b"]
    );
}

#[test]
fn it_distinguishes_loading_from_empty() {
    let mut pane = PreviewPane::default();
    assert_eq!(pane.state(), PreviewState::Loading);

    pane.set_content("");
    assert_eq!(pane.state(), PreviewState::Empty);

    pane.set_content("   \n  ");
    assert_eq!(pane.state(), PreviewState::Empty);
}

#[test]
fn it_replaces_stale_content_wholesale() {
    let mut pane = PreviewPane::default();

    pane.set_content("<p>first draft</p>");
    assert_eq!(pane.lines(), ["first draft"]);

    pane.set_content("<p>second draft</p>");
    assert_eq!(pane.state(), PreviewState::Content);
    assert_eq!(pane.lines(), ["second draft"]);

    pane.clear();
    assert_eq!(pane.state(), PreviewState::Empty);
    assert!(pane.lines().is_empty());
}
