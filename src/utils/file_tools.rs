//! 文件工具模块
//!
//! 提供文件 sink 创建前的目录检查和追加模式打开文件的工具函数。

use crate::error::{Result, RouterError};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// 文件工具结构体
///
/// 提供各种文件操作的静态方法
pub struct FileTools;

impl FileTools {
    /// 确保目录存在，如果不存在则创建
    ///
    /// # 参数
    ///
    /// * `path` - 目录路径
    ///
    /// # 返回值
    ///
    /// 成功时返回 `Ok(())`，失败时返回 `RouterError::Configuration`
    pub fn ensure_directory_exists<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();

        if !path.exists() {
            fs::create_dir_all(path).map_err(|e| RouterError::directory(path, e))?;
        }

        Self::check_directory(path)
    }

    /// 检查日志目录可用：存在、是目录、不是只读
    ///
    /// 此函数不会创建任何文件。
    pub fn check_directory<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();

        let metadata = fs::metadata(path).map_err(|e| RouterError::directory(path, e))?;

        if !metadata.is_dir() {
            return Err(RouterError::directory(
                path,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("路径存在但不是目录: {}", path.display()),
                ),
            ));
        }

        if metadata.permissions().readonly() {
            return Err(RouterError::directory(
                path,
                io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("目录不可写: {}", path.display()),
                ),
            ));
        }

        Ok(())
    }

    /// 以追加模式打开文件，不存在时创建
    ///
    /// 父目录必须已经存在。
    pub fn open_file_append<P: AsRef<Path>>(file_path: P) -> io::Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path.as_ref())
    }
}
