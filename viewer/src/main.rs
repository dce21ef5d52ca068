use viewer::app::bootstrap::run_viewer_app;

fn main() {
    run_viewer_app();
}
