//! 操作指令归一化。
//!
//! 外部输入（操作员输入、CLI 工具、旧接口）中操作指令的写法五花八门：
//! 大小写混用、`:`/`-`/`_`/空格分隔随意。本模块把自由写法归一到
//! 六个固定的规范标识之一，匹配不上就报错，绝不猜测。
//!
//! 归一化分两步，按序执行且无兜底：
//! 1. 精确别名表（规范写法本身也在表内）
//! 2. 结构化模式：`in`/`inservice` 前缀 + 子模式（entry/exit/bi 族）

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 无法归一的操作指令。原始输入原样带回，便于排障。
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

/// 规范操作指令：设备接受的六个固定命令标识。
///
/// 跨越核心边界的操作值必须是其中之一；其余写法均为别名，
/// 在进入核心前完成归一。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    InserviceEntry,
    InserviceExit,
    InserviceBidirect,
    OutOfService,
    StationClose,
    Emergency,
}

impl Operation {
    /// 规范字符串表示。
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::InserviceEntry => "inservice_entry",
            Operation::InserviceExit => "inservice_exit",
            Operation::InserviceBidirect => "inservice_bidirect",
            Operation::OutOfService => "out_of_service",
            Operation::StationClose => "station_close",
            Operation::Emergency => "emergency",
        }
    }

    /// 是否为放行类子模式（entry/exit/bidirect）。
    ///
    /// 「恢复上次模式」只认这三种，其余一律回退 bidirect。
    pub fn is_inservice(&self) -> bool {
        matches!(
            self,
            Operation::InserviceEntry | Operation::InserviceExit | Operation::InserviceBidirect
        )
    }

    /// 把自由写法归一到规范操作指令。
    ///
    /// 大小写不敏感，`:`、`-`、`_`、空格视为等价分隔符。
    /// 纯函数，无副作用；匹配不上返回 [`UnknownOperation`]，不做默认值。
    pub fn normalize(input: &str) -> Result<Operation, UnknownOperation> {
        let tokens: Vec<String> = input
            .to_ascii_lowercase()
            .split(|c: char| matches!(c, ':' | '-' | '_' | ' '))
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect();
        if tokens.is_empty() {
            return Err(UnknownOperation(input.to_string()));
        }
        let joined = tokens.join("_");

        // 1. 精确别名表
        if let Some(op) = lookup_alias(&joined) {
            return Ok(op);
        }

        // 2. 结构化模式：in[service] + 子模式
        if let Some(op) = match_inservice_pattern(&tokens) {
            return Ok(op);
        }

        Err(UnknownOperation(input.to_string()))
    }
}

/// 精确别名表。规范写法映射到自身，保证归一化幂等。
fn lookup_alias(joined: &str) -> Option<Operation> {
    match joined {
        "inservice_entry" | "entry" | "in_entry" => Some(Operation::InserviceEntry),
        "inservice_exit" | "exit" | "in_exit" => Some(Operation::InserviceExit),
        "inservice_bidirect" | "bi" | "bidirect" | "bi_direct" | "bidirection"
        | "bi_direction" | "bidirectional" | "inservice_bidirection" => {
            Some(Operation::InserviceBidirect)
        }
        "out_of_service" | "oos" | "out" | "outofservice" => Some(Operation::OutOfService),
        "station_close" | "close" => Some(Operation::StationClose),
        "emergency" | "emer" => Some(Operation::Emergency),
        _ => None,
    }
}

/// 结构化模式：`in`/`inservice`（或 `in service`）前缀 + 子模式 token。
fn match_inservice_pattern(tokens: &[String]) -> Option<Operation> {
    let rest = match tokens {
        [first, rest @ ..] if first == "inservice" => rest,
        [first, second, rest @ ..] if first == "in" && second == "service" => rest,
        [first, rest @ ..] if first == "in" => rest,
        _ => return None,
    };
    if rest.is_empty() {
        return None;
    }
    match rest.join("_").as_str() {
        "entry" => Some(Operation::InserviceEntry),
        "exit" => Some(Operation::InserviceExit),
        "bi" | "bidirect" | "bi_direct" | "bidirection" | "bi_direction" | "bidirectional" => {
            Some(Operation::InserviceBidirect)
        }
        _ => None,
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::normalize(s)
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Operation::normalize(&raw).map_err(D::Error::custom)
    }
}
