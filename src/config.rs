use serde_derive::Deserialize;
use serde_derive::Serialize;

use log::{error, warn};
use std::fs::File;
use std::io::prelude::*;

use crate::param::{MAX_MESSAGE_SIZE, READ_CHUNK_SIZE};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_www_root")]
    www_root: String,
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_max_message_size")]
    max_message_size: usize,
    #[serde(default = "default_read_chunk_size")]
    read_chunk_size: usize,
}

fn default_www_root() -> String {
    ".".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8888
}

fn default_max_message_size() -> usize {
    MAX_MESSAGE_SIZE
}

fn default_read_chunk_size() -> usize {
    READ_CHUNK_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            www_root: default_www_root(),
            host: default_host(),
            port: default_port(),
            max_message_size: default_max_message_size(),
            read_chunk_size: default_read_chunk_size(),
        }
    }

    /// 从 TOML 文件载入配置。文件缺失或格式错误时使用默认配置。
    pub fn from_toml(filename: &str) -> Self {
        let mut file = match File::open(filename) {
            Ok(f) => f,
            Err(e) => {
                warn!("无法打开配置文件{}：{}，使用默认配置", filename, e);
                return Config::new();
            }
        };
        let mut str_val = String::new();
        if let Err(e) = file.read_to_string(&mut str_val) {
            error!("读取配置文件{}失败：{}，使用默认配置", filename, e);
            return Config::new();
        }
        Self::from_toml_str(&str_val)
    }

    pub fn from_toml_str(content: &str) -> Self {
        let mut raw_config: Config = match toml::from_str(content) {
            Ok(t) => t,
            Err(e) => {
                error!("无法成功从配置文件构建配置对象：{}，使用默认配置", e);
                Config::new()
            }
        };
        if raw_config.max_message_size == 0 {
            warn!("max_message_size被设置为0，该值将被改为{}。", MAX_MESSAGE_SIZE);
            raw_config.max_message_size = MAX_MESSAGE_SIZE;
        }
        if raw_config.read_chunk_size == 0 {
            warn!("read_chunk_size被设置为0，该值将被改为{}。", READ_CHUNK_SIZE);
            raw_config.read_chunk_size = READ_CHUNK_SIZE;
        }
        raw_config
    }

    pub fn with_www_root(mut self, www_root: &str) -> Self {
        self.www_root = www_root.to_string();
        self
    }

    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }
}

impl Config {
    pub fn www_root(&self) -> &str {
        &self.www_root
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    pub fn read_chunk_size(&self) -> usize {
        self.read_chunk_size
    }
}
