use crate::config::Config;
use crate::core_auth::gateway::CredentialGateway;
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_jail::PathJail;
use crate::session::Session;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

// Specific crates for PORT and PASV commands
use crate::core_network::pasv;
use crate::core_network::port;

use crate::core_ftpcommand::admin;
use crate::core_ftpcommand::{
    cat, cp, cwd, dele, echo, help, list, mkd, mv, noop, pass, pwd, quit, retr, rmd, stat, stor,
    touch, user,
};

/// Read-only collaborators shared by every connection.
#[derive(Clone)]
pub struct ServerContext {
    pub config: Arc<Config>,
    pub jail: Arc<PathJail>,
    pub users: Arc<dyn CredentialGateway>,
}

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<String, FtpError>> + Send + 'a>>;

pub type CommandHandler = Box<
    dyn for<'a> Fn(&'a mut Session, &'a ServerContext, Vec<String>) -> HandlerFuture<'a>
        + Send
        + Sync,
>;

pub type CommandTable = HashMap<FtpCommand, Arc<CommandHandler>>;

fn handler<F>(f: F) -> Arc<CommandHandler>
where
    F: for<'a> Fn(&'a mut Session, &'a ServerContext, Vec<String>) -> HandlerFuture<'a>
        + Send
        + Sync
        + 'static,
{
    Arc::new(Box::new(f))
}

/// Builds the verb → handler table. Built once at start-up and shared
/// read-only by every connection.
pub fn initialize_command_handlers() -> CommandTable {
    let mut handlers: CommandTable = HashMap::new();

    handlers.insert(
        FtpCommand::User,
        handler(|session, ctx, args| Box::pin(user::handle_user_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Pass,
        handler(|session, ctx, args| Box::pin(pass::handle_pass_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Quit,
        handler(|session, _ctx, _args| Box::pin(quit::handle_quit_command(session))),
    );

    handlers.insert(
        FtpCommand::Noop,
        handler(|_session, _ctx, _args| Box::pin(noop::handle_noop_command())),
    );

    handlers.insert(
        FtpCommand::Help,
        handler(|_session, _ctx, _args| Box::pin(help::handle_help_command())),
    );

    handlers.insert(
        FtpCommand::Pwd,
        handler(|session, _ctx, _args| Box::pin(pwd::handle_pwd_command(session))),
    );

    handlers.insert(
        FtpCommand::Cd,
        handler(|session, ctx, args| Box::pin(cwd::handle_cd_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Ls,
        handler(|session, ctx, args| Box::pin(list::handle_ls_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::LsL,
        handler(|session, ctx, args| Box::pin(list::handle_ls_l_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Nlst,
        handler(|session, ctx, args| Box::pin(list::handle_nlst_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Mkdir,
        handler(|session, ctx, args| Box::pin(mkd::handle_mkdir_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Rmdir,
        handler(|session, ctx, args| Box::pin(rmd::handle_rmdir_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::RmR,
        handler(|session, ctx, args| Box::pin(rmd::handle_rm_r_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Rm,
        handler(|session, ctx, args| Box::pin(dele::handle_rm_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Cp,
        handler(|session, ctx, args| Box::pin(cp::handle_cp_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Mv,
        handler(|session, ctx, args| Box::pin(mv::handle_mv_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Touch,
        handler(|session, ctx, args| Box::pin(touch::handle_touch_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Echo,
        handler(|session, ctx, args| Box::pin(echo::handle_echo_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Cat,
        handler(|session, ctx, args| Box::pin(cat::handle_cat_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Stat,
        handler(|session, ctx, args| Box::pin(stat::handle_stat_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Retr,
        handler(|session, ctx, args| Box::pin(retr::handle_retr_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Stor,
        handler(|session, ctx, args| Box::pin(stor::handle_stor_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Port,
        handler(|session, ctx, args| Box::pin(port::handle_port_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::Pasv,
        handler(|session, ctx, args| Box::pin(pasv::handle_pasv_command(session, ctx, args))),
    );

    handlers.insert(
        FtpCommand::AddUser,
        handler(|session, ctx, args| {
            Box::pin(admin::adduser::handle_adduser_command(session, ctx, args))
        }),
    );

    handlers.insert(
        FtpCommand::DelUser,
        handler(|session, ctx, args| {
            Box::pin(admin::deluser::handle_deluser_command(session, ctx, args))
        }),
    );

    handlers.insert(
        FtpCommand::SetRole,
        handler(|session, ctx, args| {
            Box::pin(admin::setrole::handle_setrole_command(session, ctx, args))
        }),
    );

    handlers.insert(
        FtpCommand::Grant,
        handler(|session, ctx, args| {
            Box::pin(admin::grant::handle_grant_command(session, ctx, args))
        }),
    );

    handlers.insert(
        FtpCommand::Revoke,
        handler(|session, ctx, args| {
            Box::pin(admin::grant::handle_revoke_command(session, ctx, args))
        }),
    );

    handlers
}
