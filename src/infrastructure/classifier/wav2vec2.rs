//! Wav2Vec2 audio-classification model (conv feature encoder, transformer
//! encoder, mean-pooled classification head) on top of candle-nn, loading
//! Hugging Face `Wav2Vec2ForSequenceClassification` checkpoints.

use std::collections::HashMap;

use candle_core::{Result, Tensor, D};
use candle_nn::{
    conv1d, conv1d_no_bias, group_norm, layer_norm, linear, Conv1d, Conv1dConfig, GroupNorm,
    LayerNorm, Linear, Module, VarBuilder,
};
use serde::Deserialize;

fn default_layer_norm_eps() -> f64 {
    1e-5
}

fn default_feat_extract_norm() -> String {
    "group".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wav2Vec2Config {
    pub hidden_size: usize,
    pub num_hidden_layers: usize,
    pub num_attention_heads: usize,
    pub intermediate_size: usize,
    pub conv_dim: Vec<usize>,
    pub conv_stride: Vec<usize>,
    pub conv_kernel: Vec<usize>,
    #[serde(default)]
    pub conv_bias: bool,
    pub num_conv_pos_embeddings: usize,
    pub num_conv_pos_embedding_groups: usize,
    #[serde(default = "default_feat_extract_norm")]
    pub feat_extract_norm: String,
    #[serde(default = "default_layer_norm_eps")]
    pub layer_norm_eps: f64,
    #[serde(default)]
    pub do_stable_layer_norm: bool,
    pub classifier_proj_size: usize,
    pub id2label: HashMap<String, String>,
}

impl Wav2Vec2Config {
    pub fn num_labels(&self) -> usize {
        self.id2label.len()
    }

    pub fn label(&self, class_index: usize) -> Option<&str> {
        self.id2label
            .get(&class_index.to_string())
            .map(String::as_str)
    }
}

// The positional conv embedding is weight-norm parametrized along the kernel
// dimension: g has shape (1, 1, kernel) and v is normalized per kernel index.
fn conv1d_weight_norm(
    in_channels: usize,
    out_channels: usize,
    kernel_size: usize,
    config: Conv1dConfig,
    vb: VarBuilder,
) -> Result<Conv1d> {
    let (g_name, v_name) = if vb.contains_tensor("weight_g") {
        ("weight_g", "weight_v")
    } else {
        (
            "parametrizations.weight.original0",
            "parametrizations.weight.original1",
        )
    };
    let group_size = in_channels / config.groups;
    let weight_g = vb.get((1, 1, kernel_size), g_name)?;
    let weight_v = vb.get((out_channels, group_size, kernel_size), v_name)?;
    let norm_v = weight_v.sqr()?.sum_keepdim((0, 1))?.sqrt()?;
    let weight = weight_v.broadcast_div(&norm_v)?.broadcast_mul(&weight_g)?;
    let bias = vb.get(out_channels, "bias")?;
    Ok(Conv1d::new(weight, Some(bias), config))
}

#[derive(Debug)]
enum ConvLayerNorm {
    Group(GroupNorm),
    Layer(LayerNorm),
    None,
}

#[derive(Debug)]
struct ConvFeatureLayer {
    conv: Conv1d,
    norm: ConvLayerNorm,
}

impl ConvFeatureLayer {
    fn load(cfg: &Wav2Vec2Config, index: usize, vb: VarBuilder) -> Result<Self> {
        let in_dim = if index == 0 { 1 } else { cfg.conv_dim[index - 1] };
        let out_dim = cfg.conv_dim[index];
        let conv_cfg = Conv1dConfig {
            stride: cfg.conv_stride[index],
            ..Default::default()
        };
        let conv = if cfg.conv_bias {
            conv1d(in_dim, out_dim, cfg.conv_kernel[index], conv_cfg, vb.pp("conv"))?
        } else {
            conv1d_no_bias(in_dim, out_dim, cfg.conv_kernel[index], conv_cfg, vb.pp("conv"))?
        };
        let norm = match cfg.feat_extract_norm.as_str() {
            "group" if index == 0 => ConvLayerNorm::Group(group_norm(
                out_dim,
                out_dim,
                cfg.layer_norm_eps,
                vb.pp("layer_norm"),
            )?),
            "layer" => ConvLayerNorm::Layer(layer_norm(
                out_dim,
                cfg.layer_norm_eps,
                vb.pp("layer_norm"),
            )?),
            _ => ConvLayerNorm::None,
        };
        Ok(Self { conv, norm })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let xs = self.conv.forward(xs)?;
        let xs = match &self.norm {
            ConvLayerNorm::Group(norm) => norm.forward(&xs)?,
            ConvLayerNorm::Layer(norm) => norm
                .forward(&xs.transpose(1, 2)?)?
                .transpose(1, 2)?
                .contiguous()?,
            ConvLayerNorm::None => xs,
        };
        xs.gelu_erf()
    }
}

#[derive(Debug)]
struct FeatureProjection {
    layer_norm: LayerNorm,
    projection: Linear,
}

impl FeatureProjection {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        let last_conv_dim = *cfg.conv_dim.last().unwrap_or(&cfg.hidden_size);
        let layer_norm = layer_norm(last_conv_dim, cfg.layer_norm_eps, vb.pp("layer_norm"))?;
        let projection = linear(last_conv_dim, cfg.hidden_size, vb.pp("projection"))?;
        Ok(Self {
            layer_norm,
            projection,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        self.projection.forward(&self.layer_norm.forward(xs)?)
    }
}

#[derive(Debug)]
struct PositionalConvEmbedding {
    conv: Conv1d,
    // k even leaves one frame of excess padding to trim after the conv
    num_pad_remove: usize,
}

impl PositionalConvEmbedding {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        let kernel = cfg.num_conv_pos_embeddings;
        let conv_cfg = Conv1dConfig {
            padding: kernel / 2,
            groups: cfg.num_conv_pos_embedding_groups,
            ..Default::default()
        };
        let conv = conv1d_weight_norm(
            cfg.hidden_size,
            cfg.hidden_size,
            kernel,
            conv_cfg,
            vb.pp("conv"),
        )?;
        Ok(Self {
            conv,
            num_pad_remove: if kernel % 2 == 0 { 1 } else { 0 },
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        // [B, T, H] -> [B, H, T] for the conv, back afterwards
        let xs = xs.transpose(1, 2)?.contiguous()?;
        let mut xs = self.conv.forward(&xs)?;
        if self.num_pad_remove > 0 {
            let len = xs.dim(D::Minus1)?;
            xs = xs.narrow(D::Minus1, 0, len - self.num_pad_remove)?;
        }
        xs.gelu_erf()?.transpose(1, 2)
    }
}

#[derive(Debug)]
struct Attention {
    q_proj: Linear,
    k_proj: Linear,
    v_proj: Linear,
    out_proj: Linear,
    num_heads: usize,
    scaling: f64,
}

impl Attention {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        let hidden = cfg.hidden_size;
        let head_dim = hidden / cfg.num_attention_heads;
        Ok(Self {
            q_proj: linear(hidden, hidden, vb.pp("q_proj"))?,
            k_proj: linear(hidden, hidden, vb.pp("k_proj"))?,
            v_proj: linear(hidden, hidden, vb.pp("v_proj"))?,
            out_proj: linear(hidden, hidden, vb.pp("out_proj"))?,
            num_heads: cfg.num_attention_heads,
            scaling: (head_dim as f64).powf(-0.5),
        })
    }

    fn split_heads(&self, xs: &Tensor) -> Result<Tensor> {
        let (b, t, h) = xs.dims3()?;
        xs.reshape((b, t, self.num_heads, h / self.num_heads))?
            .transpose(1, 2)?
            .contiguous()
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let (b, t, h) = xs.dims3()?;
        let q = self.split_heads(&(self.q_proj.forward(xs)? * self.scaling)?)?;
        let k = self.split_heads(&self.k_proj.forward(xs)?)?;
        let v = self.split_heads(&self.v_proj.forward(xs)?)?;

        let scores = q.matmul(&k.transpose(2, 3)?.contiguous()?)?;
        let weights = candle_nn::ops::softmax_last_dim(&scores)?;
        let context = weights
            .matmul(&v)?
            .transpose(1, 2)?
            .contiguous()?
            .reshape((b, t, h))?;

        self.out_proj.forward(&context)
    }
}

#[derive(Debug)]
struct FeedForward {
    intermediate_dense: Linear,
    output_dense: Linear,
}

impl FeedForward {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            intermediate_dense: linear(
                cfg.hidden_size,
                cfg.intermediate_size,
                vb.pp("intermediate_dense"),
            )?,
            output_dense: linear(
                cfg.intermediate_size,
                cfg.hidden_size,
                vb.pp("output_dense"),
            )?,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let xs = self.intermediate_dense.forward(xs)?.gelu_erf()?;
        self.output_dense.forward(&xs)
    }
}

#[derive(Debug)]
struct EncoderLayer {
    attention: Attention,
    layer_norm: LayerNorm,
    feed_forward: FeedForward,
    final_layer_norm: LayerNorm,
    stable_layer_norm: bool,
}

impl EncoderLayer {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            attention: Attention::load(cfg, vb.pp("attention"))?,
            layer_norm: layer_norm(cfg.hidden_size, cfg.layer_norm_eps, vb.pp("layer_norm"))?,
            feed_forward: FeedForward::load(cfg, vb.pp("feed_forward"))?,
            final_layer_norm: layer_norm(
                cfg.hidden_size,
                cfg.layer_norm_eps,
                vb.pp("final_layer_norm"),
            )?,
            stable_layer_norm: cfg.do_stable_layer_norm,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        if self.stable_layer_norm {
            // pre-norm variant (xls-r style checkpoints)
            let xs = (xs + self.attention.forward(&self.layer_norm.forward(xs)?)?)?;
            &xs + self.feed_forward.forward(&self.final_layer_norm.forward(&xs)?)?
        } else {
            let xs = self.layer_norm.forward(&(xs + self.attention.forward(xs)?)?)?;
            self.final_layer_norm
                .forward(&(&xs + self.feed_forward.forward(&xs)?)?)
        }
    }
}

#[derive(Debug)]
struct Encoder {
    pos_conv_embed: PositionalConvEmbedding,
    layer_norm: LayerNorm,
    layers: Vec<EncoderLayer>,
    stable_layer_norm: bool,
}

impl Encoder {
    fn load(cfg: &Wav2Vec2Config, vb: VarBuilder) -> Result<Self> {
        let pos_conv_embed = PositionalConvEmbedding::load(cfg, vb.pp("pos_conv_embed"))?;
        let layer_norm = layer_norm(cfg.hidden_size, cfg.layer_norm_eps, vb.pp("layer_norm"))?;
        let layers = (0..cfg.num_hidden_layers)
            .map(|i| EncoderLayer::load(cfg, vb.pp(format!("layers.{}", i))))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            pos_conv_embed,
            layer_norm,
            layers,
            stable_layer_norm: cfg.do_stable_layer_norm,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let mut xs = (xs + self.pos_conv_embed.forward(xs)?)?;
        if !self.stable_layer_norm {
            xs = self.layer_norm.forward(&xs)?;
        }
        for layer in &self.layers {
            xs = layer.forward(&xs)?;
        }
        if self.stable_layer_norm {
            xs = self.layer_norm.forward(&xs)?;
        }
        Ok(xs)
    }
}

/// Full sequence-classification model: waveform in, per-class logits out.
/// Forward takes `&self`; there is no cached state, so a loaded model is safe
/// to share across concurrent requests.
#[derive(Debug)]
pub struct Wav2Vec2Classifier {
    conv_layers: Vec<ConvFeatureLayer>,
    feature_projection: FeatureProjection,
    encoder: Encoder,
    projector: Linear,
    classifier: Linear,
}

impl Wav2Vec2Classifier {
    pub fn load(vb: VarBuilder, cfg: &Wav2Vec2Config) -> Result<Self> {
        let w2v = vb.pp("wav2vec2");
        let conv_layers = (0..cfg.conv_dim.len())
            .map(|i| {
                ConvFeatureLayer::load(cfg, i, w2v.pp(format!("feature_extractor.conv_layers.{}", i)))
            })
            .collect::<Result<Vec<_>>>()?;
        let feature_projection = FeatureProjection::load(cfg, w2v.pp("feature_projection"))?;
        let encoder = Encoder::load(cfg, w2v.pp("encoder"))?;
        let projector = linear(cfg.hidden_size, cfg.classifier_proj_size, vb.pp("projector"))?;
        let classifier = linear(cfg.classifier_proj_size, cfg.num_labels(), vb.pp("classifier"))?;
        Ok(Self {
            conv_layers,
            feature_projection,
            encoder,
            projector,
            classifier,
        })
    }

    /// `input_values` is a normalized waveform of shape `[batch, samples]`.
    /// Returns logits of shape `[batch, num_labels]`.
    pub fn forward(&self, input_values: &Tensor) -> Result<Tensor> {
        let mut features = input_values.unsqueeze(1)?;
        for layer in &self.conv_layers {
            features = layer.forward(&features)?;
        }

        let hidden = self
            .feature_projection
            .forward(&features.transpose(1, 2)?.contiguous()?)?;
        let hidden = self.encoder.forward(&hidden)?;

        let projected = self.projector.forward(&hidden)?;
        let pooled = projected.mean(1)?;
        self.classifier.forward(&pooled)
    }
}
