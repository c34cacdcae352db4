//! # 调参配置
//!
//! 控制器的数值参数（系数、阻尼、阈值）从 TOML 加载。
//! 配置只描述数值，控制树的结构仍然由代码接线。
//!
//! ```toml
//! [controller]
//! coefficient = 0.5
//! timestep = 0.01
//!
//! [effector]
//! damping = 0.01
//! max_step_norm = 0.2
//!
//! [potential]
//! distance_threshold = 0.001
//! max_gradient_step_norm = 0.1
//! coefficient = 1.0
//!
//! [convergence]
//! task_space_threshold = 0.0001
//! ```

use basis_control::controller::{ControllerBuilder, PrimitiveController};
use basis_control::convergence::ConvergenceCriterion;
use basis_control::effector::DampedGenericEffectorTransform;
use basis_control::potential::{
    AxisAnglePotential, AxisPotential, DEFAULT_DISTANCE_THRESHOLD, QuaternionPotential,
    SquarePotential,
};
use basis_control::resource::DEFAULT_TIMESTEP;
use basis_math::{DEFAULT_DAMPING, Float};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 读写配置文件失败
    #[error("Config IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML 解析失败
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML 序列化失败
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// 数值不合法（负阻尼、非正的上限等）
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// 控制器调参配置
///
/// 所有字段都有默认值，配置文件里只需写要覆盖的部分。
///
/// # 示例
///
/// ```rust
/// use basis_sdk::config::ControlConfig;
///
/// let config = ControlConfig::from_toml_str(
///     r#"
///     [effector]
///     damping = 0.05
///
///     [convergence]
///     task_space_threshold = 1e-4
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.effector.damping, 0.05);
/// assert_eq!(config.controller.coefficient, 1.0);
/// assert_eq!(config.convergence_criteria().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// 控制器设置
    pub controller: ControllerSettings,

    /// 执行器变换设置
    pub effector: EffectorSettings,

    /// 势函数设置
    pub potential: PotentialSettings,

    /// 收敛判据设置
    pub convergence: ConvergenceSettings,
}

impl ControlConfig {
    /// 创建默认配置
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 从 TOML 字符串解析配置
    ///
    /// # 错误
    ///
    /// - `ConfigError::Parse`: TOML 语法错误或字段类型不对
    /// - `ConfigError::Invalid`: 数值不合法
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ControlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    ///
    /// # 错误
    ///
    /// 文件无法读取时返回 `ConfigError::Io`，其余同 [`from_toml_str`](Self::from_toml_str)
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded control config from {}", path.display());
        Ok(config)
    }

    /// 序列化为 TOML 字符串
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 检查数值是否合法
    ///
    /// # 错误
    ///
    /// 第一个不合法的字段以 `ConfigError::Invalid` 返回
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("controller.coefficient", self.controller.coefficient)?;
        check_positive("controller.timestep", self.controller.timestep)?;

        check_non_negative("effector.damping", self.effector.damping)?;
        if let Some(max) = self.effector.max_step_norm {
            check_positive("effector.max_step_norm", max)?;
        }

        check_non_negative(
            "potential.distance_threshold",
            self.potential.distance_threshold,
        )?;
        if let Some(max) = self.potential.max_gradient_step_norm {
            check_positive("potential.max_gradient_step_norm", max)?;
        }
        check_finite("potential.coefficient", self.potential.coefficient)?;

        let thresholds = [
            ("convergence.task_space_threshold", self.convergence.task_space_threshold),
            ("convergence.resource_step_threshold", self.convergence.resource_step_threshold),
            (
                "convergence.potential_distance_threshold",
                self.convergence.potential_distance_threshold,
            ),
        ];
        for (name, value) in thresholds {
            if let Some(value) = value {
                check_non_negative(name, value)?;
            }
        }
        Ok(())
    }

    /// 按配置生成收敛判据
    ///
    /// 顺序固定：任务空间距离、资源步长、势函数距离、势函数自身收敛。
    /// 任一判据满足即收敛；返回空列表时控制器永不收敛。
    pub fn convergence_criteria(&self) -> Vec<ConvergenceCriterion> {
        let settings = &self.convergence;
        let mut criteria = Vec::new();
        if let Some(threshold) = settings.task_space_threshold {
            criteria.push(ConvergenceCriterion::TaskSpaceDistanceThreshold(threshold));
        }
        if let Some(threshold) = settings.resource_step_threshold {
            criteria.push(ConvergenceCriterion::ResourceStepNormThreshold(threshold));
        }
        if let Some(threshold) = settings.potential_distance_threshold {
            criteria.push(ConvergenceCriterion::PotentialDistanceThreshold(threshold));
        }
        if settings.potential_converged {
            criteria.push(ConvergenceCriterion::PotentialConverged);
        }
        criteria
    }

    /// 按配置创建阻尼执行器变换
    pub fn damped_effector(
        &self,
        task_dim: usize,
        resource_dim: usize,
    ) -> DampedGenericEffectorTransform {
        let effector = DampedGenericEffectorTransform::new(task_dim, resource_dim)
            .with_damping(self.effector.damping);
        match self.effector.max_step_norm {
            Some(max) => effector.with_max_step_norm(max),
            None => effector,
        }
    }

    /// 按配置创建平方势函数
    pub fn square_potential(&self, dim: usize) -> SquarePotential {
        let potential =
            SquarePotential::new(dim).with_distance_threshold(self.potential.distance_threshold);
        match self.potential.max_gradient_step_norm {
            Some(max) => potential.with_max_gradient_step_norm(max),
            None => potential,
        }
    }

    /// 按配置创建轴加权势函数（所有轴使用同一系数）
    pub fn axis_potential(&self, dim: usize) -> AxisPotential {
        AxisPotential::new(dim, self.potential.coefficient)
            .with_distance_threshold(self.potential.distance_threshold)
    }

    /// 按配置创建四元数势函数
    pub fn quaternion_potential(&self) -> QuaternionPotential {
        QuaternionPotential::new(self.potential.coefficient)
            .with_distance_threshold(self.potential.distance_threshold)
    }

    /// 按配置创建轴角势函数
    ///
    /// 未配置 `max_gradient_step_norm` 时步长不设上限
    pub fn axis_angle_potential(&self) -> AxisAnglePotential {
        let max = self
            .potential
            .max_gradient_step_norm
            .unwrap_or(Float::INFINITY);
        AxisAnglePotential::new(self.potential.coefficient, max)
            .with_distance_threshold(self.potential.distance_threshold)
    }

    /// 把控制器系数和收敛判据应用到构造器
    pub fn configure(&self, builder: ControllerBuilder) -> ControllerBuilder {
        builder
            .coefficient(self.controller.coefficient)
            .convergence_criteria(self.convergence_criteria())
    }

    /// 把时间步长应用到根控制器
    pub fn apply_timestep(&self, controller: &mut PrimitiveController) {
        controller.set_timestep(self.controller.timestep);
    }
}

/// 控制器设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// 优先级系数（结果 = 系数 × 自身资源步长 + 合并后的下级结果）
    pub coefficient: Float,

    /// 根控制器 `add()` 使用的时间步长
    pub timestep: Float,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            coefficient: 1.0,
            timestep: DEFAULT_TIMESTEP,
        }
    }
}

/// 执行器变换设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectorSettings {
    /// 阻尼伪逆的阻尼因子
    pub damping: Float,

    /// 资源步长范数上限
    pub max_step_norm: Option<Float>,
}

impl Default for EffectorSettings {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            max_step_norm: None,
        }
    }
}

/// 势函数设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotentialSettings {
    /// 势函数自身收敛的距离阈值
    pub distance_threshold: Float,

    /// 梯度步长范数上限
    pub max_gradient_step_norm: Option<Float>,

    /// 势函数系数（轴加权系数或插值比例）
    pub coefficient: Float,
}

impl Default for PotentialSettings {
    fn default() -> Self {
        Self {
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            max_gradient_step_norm: None,
            coefficient: 1.0,
        }
    }
}

/// 收敛判据设置
///
/// 每个 `Some` 阈值生成一个判据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceSettings {
    /// 任务空间距离阈值
    pub task_space_threshold: Option<Float>,

    /// 资源步长范数阈值
    pub resource_step_threshold: Option<Float>,

    /// 势函数最近一次距离阈值
    pub potential_distance_threshold: Option<Float>,

    /// 以势函数自身的收敛判断为准
    pub potential_converged: bool,
}

fn check_finite(name: &str, value: Float) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must be finite, got {}", name, value)))
    }
}

fn check_non_negative(name: &str, value: Float) -> Result<(), ConfigError> {
    check_finite(name, value)?;
    if value < 0.0 {
        return Err(ConfigError::Invalid(format!("{} must be >= 0, got {}", name, value)));
    }
    Ok(())
}

fn check_positive(name: &str, value: Float) -> Result<(), ConfigError> {
    check_finite(name, value)?;
    if value <= 0.0 {
        return Err(ConfigError::Invalid(format!("{} must be > 0, got {}", name, value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use basis_control::effector::EffectorTransform;
    use basis_control::potential::Potential;
    use basis_math::{FloatMatrix, FloatVector};

    #[test]
    fn test_default_config() {
        let config = ControlConfig::default_config();
        assert_eq!(config.controller.coefficient, 1.0);
        assert_eq!(config.controller.timestep, DEFAULT_TIMESTEP);
        assert_eq!(config.effector.damping, DEFAULT_DAMPING);
        assert_eq!(
            config.potential.distance_threshold,
            DEFAULT_DISTANCE_THRESHOLD
        );
        assert!(config.convergence_criteria().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_string_gives_defaults() {
        let config = ControlConfig::from_toml_str("").unwrap();
        assert_eq!(config, ControlConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ControlConfig::from_toml_str(
            r#"
            [controller]
            coefficient = 0.5

            [potential]
            max_gradient_step_norm = 0.1
            "#,
        )
        .unwrap();

        assert_eq!(config.controller.coefficient, 0.5);
        assert_eq!(config.controller.timestep, DEFAULT_TIMESTEP);
        assert_eq!(config.potential.max_gradient_step_norm, Some(0.1));
        assert_eq!(config.potential.coefficient, 1.0);
    }

    #[test]
    fn test_convergence_criteria_order() {
        let config = ControlConfig::from_toml_str(
            r#"
            [convergence]
            potential_converged = true
            resource_step_threshold = 1e-5
            task_space_threshold = 1e-4
            "#,
        )
        .unwrap();

        assert_eq!(
            config.convergence_criteria(),
            vec![
                ConvergenceCriterion::TaskSpaceDistanceThreshold(1e-4),
                ConvergenceCriterion::ResourceStepNormThreshold(1e-5),
                ConvergenceCriterion::PotentialConverged,
            ]
        );
    }

    #[test]
    fn test_parse_error() {
        let err = ControlConfig::from_toml_str("[effector]\ndamping = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values() {
        let negative_damping = ControlConfig::from_toml_str("[effector]\ndamping = -0.1");
        assert!(matches!(negative_damping, Err(ConfigError::Invalid(_))));

        let zero_step = ControlConfig::from_toml_str("[effector]\nmax_step_norm = 0.0");
        assert!(matches!(zero_step, Err(ConfigError::Invalid(_))));

        let zero_timestep = ControlConfig::from_toml_str("[controller]\ntimestep = 0.0");
        let err = zero_timestep.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid config value: controller.timestep must be > 0, got 0"
        );
    }

    #[test]
    fn test_missing_file() {
        let err = ControlConfig::load_from_file("/nonexistent/basis/control.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_save_and_load_file() {
        let mut config = ControlConfig::default();
        config.effector.max_step_norm = Some(0.25);
        config.convergence.task_space_threshold = Some(1e-3);

        let file_name = format!("basis-sdk-config-{}.toml", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        config.save_to_file(&path).unwrap();
        let loaded = ControlConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_damped_effector_clamps_step() {
        let config = ControlConfig::from_toml_str("[effector]\nmax_step_norm = 0.5").unwrap();
        let mut effector = config.damped_effector(2, 2);
        effector
            .update(&FloatVector::zeros(2), &FloatMatrix::identity(2, 2))
            .unwrap();

        let step = effector.exec(&FloatVector::from_vec(vec![3.0, 4.0]));
        assert!((step.norm() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_square_potential_clamps_gradient() {
        let content = "[potential]\nmax_gradient_step_norm = 0.1";
        let config = ControlConfig::from_toml_str(content).unwrap();
        let mut potential = config.square_potential(3);
        let reference = FloatVector::from_vec(vec![1.0, 0.0, 0.0]);

        let step = potential
            .gradient(&[reference], &FloatVector::zeros(3))
            .unwrap();
        assert!((step.norm() - 0.1).abs() < 1e-12);
    }
}
