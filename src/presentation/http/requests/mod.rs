use poem_openapi::Object;

#[derive(Object, Debug)]
pub struct CreateMessageRequestDto {
    pub content: String,
    pub phone_number: String,
}
