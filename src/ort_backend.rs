// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! ONNX Runtime 推理后端
//! 会话在进程启动时加载一次, 之后只读共享 (Session::run 需要 &mut, 故以 Mutex 包装)

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use ndarray::{Array, IxDyn};
use ort::execution_providers::{CUDAExecutionProvider, TensorRTExecutionProvider};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use tracing::info;

/// 执行设备 (Execution Provider)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrtEP {
    #[default]
    CPU,
    CUDA(i32),
    Trt(i32),
}

impl OrtEP {
    pub fn from_flags(trt: bool, cuda: bool, device_id: i32) -> Self {
        if trt {
            OrtEP::Trt(device_id)
        } else if cuda {
            OrtEP::CUDA(device_id)
        } else {
            OrtEP::CPU
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrtConfig {
    pub f: PathBuf,
    pub ep: OrtEP,
    pub intra_threads: usize,
}

impl OrtConfig {
    pub fn new(f: impl Into<PathBuf>, ep: OrtEP) -> Self {
        Self {
            f: f.into(),
            ep,
            intra_threads: 1,
        }
    }
}

pub struct OrtBackend {
    session: Mutex<Session>,
    inputs: Vec<String>,
    outputs: Vec<String>,
    ep: OrtEP,
    path: PathBuf,
}

impl OrtBackend {
    pub fn build(config: OrtConfig) -> Result<Self> {
        info!("📦 加载模型: {}", config.f.display());

        let mut builder = Session::builder()?;
        builder = match config.ep {
            OrtEP::CPU => builder,
            OrtEP::CUDA(device_id) => {
                info!("⚙️ 启用 CUDA (device {})", device_id);
                builder.with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(device_id)
                    .build()])?
            }
            OrtEP::Trt(device_id) => {
                info!("⚙️ 启用 TensorRT (device {})", device_id);
                builder.with_execution_providers([
                    TensorRTExecutionProvider::default()
                        .with_device_id(device_id)
                        .build(),
                    CUDAExecutionProvider::default()
                        .with_device_id(device_id)
                        .build(),
                ])?
            }
        };

        let session = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.intra_threads)?
            .commit_from_file(&config.f)
            .with_context(|| format!("Failed to load model {}", config.f.display()))?;

        let inputs = session.inputs.iter().map(|x| x.name.clone()).collect();
        let outputs = session.outputs.iter().map(|x| x.name.clone()).collect();

        Ok(Self {
            session: Mutex::new(session),
            inputs,
            outputs,
            ep: config.ep,
            path: config.f,
        })
    }

    /// 执行一次前向推理, 返回全部输出 (按模型输出顺序)
    pub fn run(&self, xs: Array<f32, IxDyn>, profile: bool) -> Result<Vec<Array<f32, IxDyn>>> {
        let t = Instant::now();
        let input = Tensor::from_array(xs.as_standard_layout().into_owned())?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("ONNX session mutex poisoned"))?;
        let outputs = session.run(ort::inputs![input])?;

        let mut ys = Vec::with_capacity(outputs.len());
        for i in 0..outputs.len() {
            let (shape, data) = outputs[i].try_extract_tensor::<f32>()?;
            let dims: Vec<usize> = shape.iter().map(|&d| d.max(0) as usize).collect();
            ys.push(Array::from_shape_vec(IxDyn(&dims), data.to_vec())?);
        }

        if profile {
            info!("[ORT run]: {:?}", t.elapsed());
        }
        Ok(ys)
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn summary(&self) {
        info!(
            "模型: {} | EP: {:?} | 输入: {:?} | 输出: {:?}",
            self.path.display(),
            self.ep,
            self.inputs,
            self.outputs
        );
    }
}
