use std::error::Error;
use std::path::PathBuf;

use pixel_plot::{Color, Offset, PlotContext, Point2, Point3, SeriesKind, Size};

/// Small deterministic generator so the output is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next_unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as f64 / (1u64 << 31) as f64
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);

    let mut ctx = PlotContext::headless();
    ctx.window_mut().set_title("pixel-plot demo");

    {
        ctx.view("simple").set_title("line and histogram");
        let figure = ctx.figure("simple");
        figure
            .series("line")
            .set_value([1.0, 2.0, 3.0, 4.0, 5.0])?
            .set_kind(SeriesKind::DotLine)
            .set_color(Color::BLUE);
        figure
            .series("histogram")
            .set_value([1.0, 2.0, 3.0, 4.0, 5.0])?
            .set_kind(SeriesKind::Histogram)
            .set_color(Color::RED);
    }

    {
        ctx.view("math").set_title("math curves");
        ctx.move_view("math", Offset::new(300, 0));
        let figure = ctx.figure("math");
        figure
            .series("parabola")
            .set_value((0..=10).map(|i| f64::from((i - 4) * (i - 4) - 6)))?
            .set_kind(SeriesKind::DotLine)
            .set_color(Color::GREEN);
        figure
            .series("sine")
            .set_value((0..=10).map(|i| (f64::from(i) / 1.5).sin() * 5.0))?
            .set_kind(SeriesKind::DotLine)
            .set_color(Color::BLUE);
        figure
            .series("threshold")
            .set_value([15.0])?
            .set_kind(SeriesKind::Horizontal)
            .set_color(Color::RED);
    }

    {
        ctx.view("scatter").set_title("scatter plots");
        ctx.move_view("scatter", Offset::new(600, 0));
        let mut rng = Lcg(7);
        let figure = ctx.figure("scatter");
        let uniform: Vec<_> = (0..=100)
            .map(|_| (rng.next_unit() * 10.0, rng.next_unit() * 10.0))
            .collect();
        figure
            .series("uniform")
            .set(uniform)?
            .set_kind(SeriesKind::Dots)
            .set_color(Color::ORANGE);
        let mut skewed = || (rng.next_unit() * 3.3).exp() - 1.0;
        let exponential: Vec<_> = (0..=100).map(|_| (skewed(), skewed())).collect();
        figure
            .series("exponential")
            .set(exponential)?
            .set_kind(SeriesKind::Dots)
            .set_color(Color::MAGENTA);
    }

    {
        ctx.view("histograms").set_title("multiple histograms");
        ctx.move_view("histograms", Offset::new(0, 300));
        let figure = ctx.figure("histograms");
        for (label, values, color) in [
            ("1", vec![1.0, 2.0, 3.0, 4.0, 5.0], Color::BLUE),
            ("2", vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0], Color::GREEN),
            ("3", vec![3.0, 1.0, -1.0, 1.0, 3.0, 7.0], Color::RED),
        ] {
            figure
                .series(label)
                .set_value(values)?
                .set_kind(SeriesKind::Histogram)
                .set_color(color.alpha(201));
        }
    }

    {
        ctx.view("parametric").set_title("parametric plots");
        ctx.move_view("parametric", Offset::new(300, 300));
        let figure = ctx.figure("parametric");
        figure.set_square(true);
        let circle = (0..=100).map(|i| {
            let t = f64::from(i) * 0.0628 + 4.0;
            (t.cos() * 2.0, t.sin() * 2.0)
        });
        figure
            .series("circle")
            .set(circle)?
            .set_kind(SeriesKind::Line)
            .set_color(Color::RED);
        let lissajous = (0..=100).map(|i| {
            let i = f64::from(i);
            ((i * 0.2513 + 1.0).cos(), (i * 0.0628 + 4.0).sin())
        });
        figure.series("lissajous").set(lissajous)?;
    }

    {
        ctx.view("range").set_title("range plot");
        ctx.move_view("range", Offset::new(600, 300));
        let mut rng = Lcg(11);
        let figure = ctx.figure("range");
        let apples: Vec<_> = (0..=10)
            .map(|i| {
                let v = f64::from((i - 4) * (i - 4) - 6);
                Point3::new(
                    v + 10.0 + 5.0 * rng.next_unit(),
                    v + 5.0 * rng.next_unit(),
                    v + 20.0 + 5.0 * rng.next_unit(),
                )
            })
            .collect();
        figure
            .series("apples")
            .set_value(apples)?
            .set_kind(SeriesKind::RangeLine)
            .set_color(Color::ORANGE);
    }

    {
        ctx.view("colors").set_title("auto color");
        ctx.move_view("colors", Offset::new(0, 600));
        let figure = ctx.figure("colors");
        let bars = (0..16).map(|i| Point2::new(6.0, f64::from(Color::index(i).hue_of())));
        figure
            .series("color")
            .set_kind(SeriesKind::Vistogram)
            .set_dynamic_color(true)
            .set_legend(false)
            .set_value(bars)?;
    }

    ctx.show_all()?;

    let names: Vec<String> = ctx.figure_names().map(str::to_string).collect();
    for name in &names {
        if let Some(figure) = ctx.get_figure(name) {
            let path = out_dir.join(format!("pixel-plot-{name}.png"));
            if figure.draw_file(&path, Size::new(400, 300))? {
                println!("wrote {}", path.display());
            }
        }
    }

    let window_path = out_dir.join("pixel-plot-window.png");
    ctx.window().buffer().write_png(&window_path)?;
    println!("wrote {}", window_path.display());
    Ok(())
}
