use pronounce_backend::auth::sign_jwt_for_user;

use super::app::TestApp;

pub fn auth_header(token: &str) -> String {
    format!("Bearer {token}")
}

/// 为随机用户签发令牌，返回 (user_id, token)
pub fn new_user_token(app: &TestApp) -> (String, String) {
    let user_id = format!("user-{}", uuid::Uuid::new_v4().simple());
    let token = token_for(app, &user_id);
    (user_id, token)
}

pub fn token_for(app: &TestApp, user_id: &str) -> String {
    sign_jwt_for_user(user_id, &app.config.jwt_secret, 1).expect("sign token")
}

pub fn bearer(app: &TestApp) -> (String, Vec<(&'static str, String)>) {
    let (user_id, token) = new_user_token(app);
    (user_id, vec![("authorization", auth_header(&token))])
}
