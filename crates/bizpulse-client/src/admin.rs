//! User administration and blob-storage export endpoints.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{AzureStatus, UploadResult, User, UsersPayload};

impl ApiClient {
    /// Registered users (`GET /users`, payload `{"users": [...]}`).
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        let payload: UsersPayload = self.get_data("users", &[]).await?;
        Ok(payload.users)
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn azure_status(&self) -> Result<AzureStatus, ApiError> {
        self.get_data("users/azure-status", &[]).await
    }

    /// Triggers the server-side upload of the export file.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request or payload decoding.
    pub async fn upload_to_azure(&self) -> Result<UploadResult, ApiError> {
        self.post_data::<UploadResult, ()>("users/upload-to-azure", None).await
    }
}
