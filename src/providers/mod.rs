pub mod twitter;

#[cfg(test)]
mod tests;
