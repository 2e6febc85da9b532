//! Point-picking state machine, exercised headless.
use bandmap::{ClickKind, PointBrowser};

#[test]
fn digitizing_two_transects() {
    let mut browser = PointBrowser::new((500, 600));

    // First transect: three points, closed by a modifier click.
    browser.click(10.0, 20.0, ClickKind::Extend);
    browser.click(50.0, 60.0, ClickKind::Extend);
    browser.click(90.0, 100.0, ClickKind::NewLine);
    // Accidental click with the skip key held changes nothing.
    browser.click(200.0, 200.0, ClickKind::Skip);
    // Second transect.
    browser.click(300.0, 310.0, ClickKind::Extend);
    browser.click(350.0, 360.0, ClickKind::Extend);

    let lines = browser.polylines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], vec![(10.0, 20.0), (50.0, 60.0), (90.0, 100.0)]);
    assert_eq!(lines[1], vec![(300.0, 310.0), (350.0, 360.0)]);
}

#[test]
fn clicks_outside_the_array_are_dropped() {
    let mut browser = PointBrowser::new((100, 200));
    browser.click(199.0, 99.0, ClickKind::Extend);
    browser.click(200.0, 50.0, ClickKind::Extend);
    browser.click(50.0, 100.0, ClickKind::Extend);
    browser.click(-0.5, 0.0, ClickKind::Extend);
    assert_eq!(browser.points(), &[(199.0, 99.0)]);
}

#[test]
fn closing_clicks_end_their_lines() {
    let mut browser = PointBrowser::new((100, 100));
    browser.click(1.0, 1.0, ClickKind::NewLine);
    browser.click(2.0, 2.0, ClickKind::NewLine);
    browser.click(3.0, 3.0, ClickKind::NewLine);
    let lines = browser.polylines();
    // The first point opens a line regardless of its flag; each later
    // closing click ends the line it belongs to.
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], vec![(1.0, 1.0), (2.0, 2.0)]);
    assert_eq!(lines[1], vec![(3.0, 3.0)]);
}
