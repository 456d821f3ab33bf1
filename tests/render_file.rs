use pixel_plot::{Color, Figure, PlotContext, SeriesKind, Size};

fn histogram_figure() -> Figure {
    let mut figure = Figure::new("file");
    figure
        .series("bars")
        .set_kind(SeriesKind::Histogram)
        .set_color(Color::RED)
        .add_value([1.0, 3.0, 2.0, 5.0, 4.0])
        .expect("scalar samples");
    figure
        .series("line")
        .set_kind(SeriesKind::DotLine)
        .set_color(Color::BLUE)
        .add_value([1.0, 2.0, 3.0])
        .expect("scalar samples");
    figure
}

#[test]
fn draw_file_writes_png_of_requested_size() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plot.png");

    let written = histogram_figure()
        .draw_file(&path, Size::new(320, 240))
        .expect("consistent series");
    assert!(written);

    let image = image::open(&path).expect("decodable png").to_rgb8();
    assert_eq!(image.dimensions(), (320, 240));
    let red = image.pixels().filter(|px| px.0 == [255, 0, 0]).count();
    assert!(red > 0);
}

#[test]
fn empty_figure_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.png");

    let written = Figure::new("empty")
        .draw_file(&path, Size::new(100, 100))
        .expect("nothing to verify");
    assert!(!written);
    assert!(!path.exists());
}

#[test]
fn inconsistent_series_is_reported_without_writing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.png");

    let mut figure = Figure::new("bad");
    figure
        .series("band")
        .add_value([1.0, 2.0])
        .expect("scalar samples")
        .set_kind(SeriesKind::Range);
    assert!(figure.draw_file(&path, Size::new(100, 100)).is_err());
    assert!(!path.exists());
}

#[test]
fn window_buffer_round_trips_through_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("window.png");

    let mut ctx = PlotContext::headless();
    ctx.figure("a")
        .series("s")
        .add_value([2.0, 1.0, 3.0])
        .expect("scalar samples");
    ctx.show("a", true).expect("consistent series");
    ctx.window().buffer().write_png(&path).expect("png written");

    let image = image::open(&path).expect("decodable png").to_rgb8();
    assert_eq!(image.dimensions(), (300, 300));
    assert_eq!(image.as_raw().as_slice(), ctx.window().buffer().as_bytes());
}
