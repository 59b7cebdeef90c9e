use dwell::hand::FrameInput;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Frame(FrameInput),
    ConfigReload,
    Shutdown,
}
