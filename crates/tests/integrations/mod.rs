mod dispatch;
mod levels;
mod routing;
mod support;
