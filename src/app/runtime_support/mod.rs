mod window_runtime;

pub(crate) use window_runtime::ToastRuntime;
