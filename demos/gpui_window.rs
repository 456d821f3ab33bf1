#[cfg(feature = "gpui")]
use std::time::Duration;

#[cfg(feature = "gpui")]
use gpui::{
    AppContext, Application, AsyncWindowContext, Bounds, Timer, WindowBounds, WindowOptions, px,
    size,
};

#[cfg(feature = "gpui")]
use pixel_plot::{
    Color, GpuiDisplay, GpuiFrameView, MouseEvent, PlotContext, Rect, SeriesKind, Window,
};

#[cfg(feature = "gpui")]
fn main() {
    env_logger::init();
    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(600.0), px(300.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |window, cx| {
            let display = GpuiDisplay::new();
            let mut plot_window = Window::new(display.clone());
            plot_window.set_title("pixel-plot live").set_cursor(true);
            let view_handle = cx.new(|_| GpuiFrameView::new(display, plot_window.name()));

            let mut ctx = PlotContext::new(plot_window);
            ctx.view("live").resize(Rect::new(0, 0, 400, 300));
            ctx.view("bars")
                .resize(Rect::new(400, 0, 200, 300))
                .mouse(|event: &MouseEvent| {
                    log::info!("bars: {:?} at ({}, {})", event.kind, event.x, event.y)
                });
            ctx.figure("live")
                .series("sensor")
                .set_kind(SeriesKind::Line)
                .set_color(Color::SKY);
            ctx.figure("bars")
                .series("level")
                .set_kind(SeriesKind::Histogram)
                .set_color(Color::ORANGE.alpha(200));

            let view_for_task = view_handle.clone();
            window
                .spawn(cx, move |cx: &mut AsyncWindowContext| {
                    let mut cx = cx.clone();
                    async move {
                        let mut phase = 0.0_f64;
                        loop {
                            Timer::after(Duration::from_millis(33)).await;
                            let live = ctx.figure("live");
                            let samples: Vec<f64> = (0..100)
                                .map(|i| (phase + f64::from(i) * 0.1).sin())
                                .collect();
                            if live.series("sensor").set_value(samples).is_err() {
                                break;
                            }
                            let levels: Vec<f64> = (0..8)
                                .map(|i| (phase * 0.5 + f64::from(i)).cos().abs())
                                .collect();
                            let bars = ctx.figure("bars");
                            if bars.series("level").set_value(levels).is_err() {
                                break;
                            }
                            phase += 0.05;
                            if let Err(err) = ctx.show_all() {
                                log::error!("draw failed: {err}");
                                break;
                            }
                            ctx.window_mut().tick();
                            cx.update(|_, cx| {
                                view_for_task.update(cx, |_view, view_cx| {
                                    view_cx.notify();
                                });
                            })
                            .ok();
                        }
                    }
                })
                .detach();

            view_handle
        })
        .unwrap();
    });
}

#[cfg(not(feature = "gpui"))]
fn main() {
    eprintln!("Enable the gpui feature to run this example.");
}
