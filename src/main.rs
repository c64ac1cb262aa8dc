// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 极简 HTTP/1.1 服务器
//!
//! 该程序直接在 TCP 字节流上实现 HTTP/1.1 的一个子集：
//! - 每个连接只处理一个请求，处理完毕立即关闭
//! - 连接按顺序逐个处理，不存在并发
//! - 支持 GET（静态文件）、POST、PUT、DELETE（回显）

use tinyhttpd::{
    config::Config,
    dispatch::{Dispatcher, LocalFiles},
    server::serve,
};

use log::{error, info, LevelFilter};
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
};
use tokio::net::TcpListener;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 1. 初始化日志系统：优先使用外部 YAML 配置，失败时退回到仅输出到控制台
    init_logging("config/log4rs.yaml");

    // 2. 环境配置加载：从 TOML 文件读取运行参数
    let config = Config::from_toml("config/development.toml");
    info!("配置文件已载入");

    // 3. 绑定端口
    let address = config.address();
    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("无法绑定地址：{}，错误：{}", address, e);
            std::process::exit(1);
        }
    };

    // 4. 主循环，只会被外部信号终止
    let files = LocalFiles::new(config.www_root());
    info!("www root: {}", files.root().display());
    let dispatcher = Dispatcher::new(files);
    serve(listener, dispatcher, config).await;
}

fn init_logging(path: &str) {
    let err = match log4rs::init_file(path, Default::default()) {
        Ok(()) => return,
        Err(e) => e,
    };

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {m}{n}",
        )))
        .build();
    let fallback = log4rs::Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info));

    match fallback.map(log4rs::init_config) {
        Ok(Ok(_)) => log::warn!("无法载入日志配置{}：{}，仅输出到控制台", path, err),
        Ok(Err(e)) => eprintln!("初始化日志系统失败：{}", e),
        Err(e) => eprintln!("构建日志配置失败：{}", e),
    }
}
